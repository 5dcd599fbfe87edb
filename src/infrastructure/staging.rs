use crate::config::ModuleConfig;
use crate::error::{ModuleError, Result};
use tracing::{info, warn};

/// Prepares the module's working directory and checks the staging pool.
pub async fn setup_staging(config: &ModuleConfig) -> Result<()> {
    tokio::fs::create_dir_all(&config.directory)
        .await
        .map_err(|e| ModuleError::io(&config.directory, e))?;

    info!(
        "📂 Staging pool: {} (working dir: {})",
        config.limbo.display(),
        config.directory.display()
    );

    // A missing pool just means nothing is staged yet.
    if !config.limbo.is_dir() {
        warn!("Staging pool {} is not reachable", config.limbo.display());
    }

    Ok(())
}
