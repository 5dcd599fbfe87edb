use crate::error::Result;
use crate::models::{Outcome, ScanInfo};
use crate::services::archive::ScanHandle;
use crate::services::report::Report;

/// Hooks a scan-level module exposes to the pipeline.
#[async_trait::async_trait]
pub trait ScanModule: Send + Sync {
    fn name(&self) -> &str;

    /// Error report filled by the runner and flushed by `afterrun`
    fn report_mut(&mut self) -> &mut Report;

    /// Called once before the sessions of a project are visited
    async fn prerun(&mut self, settings_filename: &str) -> Result<()>;

    /// Admission check; `run` is only called when this returns true
    async fn needs_run(&self, scan: &dyn ScanHandle) -> Result<bool>;

    async fn run(&self, info: &ScanInfo, scan: &dyn ScanHandle) -> Result<Outcome>;

    /// Called once after all sessions of a project were visited
    async fn afterrun(&mut self, project: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub processed: usize,
    pub uploaded: usize,
    pub failed: usize,
}

/// Drives a module over the scans of one project, one scan at a time.
pub struct ModuleRunner<M: ScanModule> {
    module: M,
}

impl<M: ScanModule> ModuleRunner<M> {
    pub fn new(module: M) -> Self {
        Self { module }
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn into_inner(self) -> M {
        self.module
    }

    pub async fn run_project<S: ScanHandle>(
        &mut self,
        project: &str,
        settings_filename: &str,
        scans: &[S],
    ) -> Result<RunSummary> {
        tracing::info!("🔎 {}: checking {} scan(s) of {}", self.module.name(), scans.len(), project);
        self.module.prerun(settings_filename).await?;

        let mut summary = RunSummary::default();
        for scan in scans {
            summary.checked += 1;
            let info = scan.info();

            match self.process_scan(&info, scan).await {
                Ok(None) => {}
                Ok(Some(outcome)) => {
                    summary.processed += 1;
                    if outcome.is_uploaded() {
                        summary.uploaded += 1;
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("Failed to process {}: {}", info.label(), e);
                    self.module
                        .report_mut()
                        .add(format!("{}: {}", info.label(), e));
                }
            }
        }

        self.module.afterrun(project).await?;
        tracing::info!(
            "✅ {}: {} checked, {} processed, {} uploaded, {} failed",
            self.module.name(),
            summary.checked,
            summary.processed,
            summary.uploaded,
            summary.failed
        );
        Ok(summary)
    }

    async fn process_scan<S: ScanHandle>(&self, info: &ScanInfo, scan: &S) -> Result<Option<Outcome>> {
        if !self.module.needs_run(scan).await? {
            return Ok(None);
        }
        self.module.run(info, scan).await.map(Some)
    }
}
