use crate::error::{ModuleError, Result};
use crate::models::ScanMap;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODULE_NAME: &str = "edat_limbo2xnat";
pub const DEFAULT_LIMBO_DIR: &str = "/data/h_taylor/sync-LIMBO";
pub const DEFAULT_SCAN_TYPES: &str = "fMRI_EDP,fMRI_Posner,fMRI_NBack,fMRI_EmoStroop";

/// Construction-time configuration of the EDAT module
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    /// Module name used in logs and the report subject (default: "edat_limbo2xnat")
    pub module_name: String,

    /// Scratch directory for temporary files (default: "/tmp/<module_name>")
    pub directory: PathBuf,

    /// Address the end-of-run report goes to; no report is sent when unset
    pub email: Option<String>,

    /// Header of the error report
    pub text_report: String,

    /// Root of the shared staging pool (default: "/data/h_taylor/sync-LIMBO")
    pub limbo: PathBuf,

    /// Scan types this module looks at
    pub scan_types: Vec<String>,

    /// Scan type to staging file pattern
    pub scan_map: ScanMap,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
            directory: env::temp_dir().join(DEFAULT_MODULE_NAME),
            email: None,
            text_report: default_text_report(DEFAULT_MODULE_NAME),
            limbo: PathBuf::from(DEFAULT_LIMBO_DIR),
            scan_types: parse_scan_types(DEFAULT_SCAN_TYPES),
            scan_map: ScanMap::default(),
        }
    }
}

impl ModuleConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default = Self::default();

        let module_name = lookup("EDAT_MODULE_NAME").unwrap_or(default.module_name);

        let scan_map = match lookup("EDAT_SCAN_MAP") {
            Some(raw) => {
                let overrides: ScanMap = serde_json::from_str(&raw)
                    .map_err(|e| ModuleError::Config(format!("EDAT_SCAN_MAP: {}", e)))?;
                default.scan_map.merged(overrides)
            }
            None => default.scan_map,
        };

        let config = Self {
            directory: lookup("EDAT_TMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| env::temp_dir().join(&module_name)),

            email: lookup("EDAT_EMAIL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),

            text_report: lookup("EDAT_TEXT_REPORT")
                .unwrap_or_else(|| default_text_report(&module_name)),

            limbo: lookup("EDAT_LIMBO_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.limbo),

            scan_types: lookup("EDAT_SCAN_TYPES")
                .map(|v| parse_scan_types(&v))
                .unwrap_or(default.scan_types),

            scan_map,
            module_name,
        };

        config.warn_unmapped_types();
        Ok(config)
    }

    pub fn with_limbo(mut self, limbo: impl Into<PathBuf>) -> Self {
        self.limbo = limbo.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_eligible(&self, scan_type: &str) -> bool {
        self.scan_types.iter().any(|t| t == scan_type)
    }

    fn warn_unmapped_types(&self) {
        for scan_type in &self.scan_types {
            if !self.scan_map.contains(scan_type) {
                tracing::warn!("Scan type '{}' has no file pattern configured", scan_type);
            }
        }
    }
}

fn default_text_report(module_name: &str) -> String {
    format!("ERROR in module {}:\n", module_name)
}

/// Split a comma separated list of scan types, dropping blanks.
pub fn parse_scan_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
