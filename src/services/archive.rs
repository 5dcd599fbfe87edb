use crate::error::Result;
use crate::models::ScanInfo;
use std::path::Path;

/// What the pipeline exposes for one archived scan.
#[async_trait::async_trait]
pub trait ScanHandle: Send + Sync {
    /// Scan metadata (type, subject, session)
    fn info(&self) -> ScanInfo;

    /// Whether a resource with this name is already attached to the scan
    async fn has_resource(&self, resource: &str) -> Result<bool>;

    /// Upload a local file into a resource of the scan
    async fn put_resource_file(
        &self,
        resource: &str,
        dst_name: &str,
        src: &Path,
        overwrite: bool,
    ) -> Result<()>;
}

/// Scan handle that only logs the upload it would perform.
pub struct DryRunScan {
    info: ScanInfo,
    resources: Vec<String>,
}

impl DryRunScan {
    pub fn new(info: ScanInfo) -> Self {
        Self {
            info,
            resources: Vec::new(),
        }
    }

    /// Pretend the scan already carries `resource`.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.push(resource.into());
        self
    }
}

#[async_trait::async_trait]
impl ScanHandle for DryRunScan {
    fn info(&self) -> ScanInfo {
        self.info.clone()
    }

    async fn has_resource(&self, resource: &str) -> Result<bool> {
        Ok(self.resources.iter().any(|r| r == resource))
    }

    async fn put_resource_file(
        &self,
        resource: &str,
        dst_name: &str,
        src: &Path,
        overwrite: bool,
    ) -> Result<()> {
        tracing::info!(
            "DryRunScan: would upload {} to {}/{} (overwrite={})",
            src.display(),
            resource,
            dst_name,
            overwrite
        );
        Ok(())
    }
}
