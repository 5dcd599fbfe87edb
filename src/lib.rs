pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

pub use config::ModuleConfig;
pub use error::{ModuleError, Result};
pub use models::{EDAT_RESOURCE, Outcome, ScanInfo, ScanMap};
pub use services::archive::{DryRunScan, ScanHandle};
pub use services::report::{LogNotifier, Notifier, Report};
pub use services::resolver::EdatModule;
pub use services::runner::{ModuleRunner, RunSummary, ScanModule};
