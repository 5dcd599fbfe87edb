use crate::config::ModuleConfig;
use crate::error::{ModuleError, Result};
use crate::models::{EDAT_RESOURCE, Outcome, ScanInfo};
use crate::services::archive::ScanHandle;
use crate::services::report::{Notifier, Report, report_subject};
use crate::services::runner::ScanModule;
use crate::services::staging::StagingPool;
use crate::utils::naming::{UploadTriple, destination_name, render_pattern};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    None,
    Ambiguous(usize),
    One(PathBuf),
}

/// Picks the staged file for a scan out of the glob matches.
///
/// Exactly two matches on a session whose label ends in `b` (a repeat
/// acquisition) resolve to the lexicographically greater path. Any other
/// multiplicity is left alone.
pub fn select_candidate(mut candidates: Vec<PathBuf>, session_label: &str) -> Selection {
    if candidates.len() == 2 && session_label.ends_with('b') {
        candidates.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        return candidates.pop().map_or(Selection::None, Selection::One);
    }

    match candidates.len() {
        0 => Selection::None,
        1 => candidates.pop().map_or(Selection::None, Selection::One),
        n => Selection::Ambiguous(n),
    }
}

/// Uploads exported task data from the staging pool to scans missing an EDAT resource.
pub struct EdatModule {
    config: ModuleConfig,
    staging: StagingPool,
    notifier: Arc<dyn Notifier>,
    report: Report,
}

impl EdatModule {
    pub fn new(config: ModuleConfig, notifier: Arc<dyn Notifier>) -> Self {
        let staging = StagingPool::new(config.limbo.clone());
        let report = Report::new(config.text_report.clone());
        Self {
            config,
            staging,
            notifier,
            report,
        }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Glob matches for a scan, before any disambiguation
    pub fn load_limbo(&self, info: &ScanInfo) -> Result<Option<Vec<PathBuf>>> {
        let Some(template) = self.config.scan_map.pattern(&info.scan_type) else {
            return Ok(None);
        };
        let pattern = render_pattern(template, &info.subject_label);
        self.staging.find(&pattern).map(Some)
    }
}

async fn exists(path: &Path) -> Result<bool> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| ModuleError::io(path, e))
}

#[async_trait::async_trait]
impl ScanModule for EdatModule {
    fn name(&self) -> &str {
        &self.config.module_name
    }

    fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }

    async fn prerun(&mut self, _settings_filename: &str) -> Result<()> {
        Ok(())
    }

    async fn needs_run(&self, scan: &dyn ScanHandle) -> Result<bool> {
        let info = scan.info();
        if !self.config.is_eligible(&info.scan_type) {
            return Ok(false);
        }

        if scan.has_resource(EDAT_RESOURCE).await? {
            tracing::debug!("Has EDAT");
            return Ok(false);
        }

        Ok(true)
    }

    async fn run(&self, info: &ScanInfo, scan: &dyn ScanHandle) -> Result<Outcome> {
        let Some(candidates) = self.load_limbo(info)? else {
            tracing::debug!("No file pattern for scan type {}", info.scan_type);
            return Ok(Outcome::UnknownType);
        };
        for candidate in &candidates {
            tracing::debug!("Candidate: {}", candidate.display());
        }

        let edat = match select_candidate(candidates, &info.session_label) {
            Selection::None => {
                tracing::debug!("failed to find edat file");
                return Ok(Outcome::NoMatch);
            }
            Selection::Ambiguous(count) => {
                tracing::debug!("multiple edat files found");
                return Ok(Outcome::Ambiguous(count));
            }
            Selection::One(path) => path,
        };

        let triple = UploadTriple::from_edat(edat);

        if !exists(&triple.tab).await? {
            tracing::warn!("tab does not exist:{}", triple.tab.display());
            return Ok(Outcome::MissingTab(triple.tab));
        }

        if !exists(&triple.txt).await? {
            tracing::warn!("txt does not exist:{}", triple.txt.display());
        }

        // Only the _tab.txt export goes to the archive.
        let destination = destination_name(&triple.tab);
        scan.put_resource_file(EDAT_RESOURCE, &destination, &triple.tab, true)
            .await?;

        tracing::info!(
            scan = %info.label(),
            "Uploaded {} to {}/{}",
            triple.tab.display(),
            EDAT_RESOURCE,
            destination
        );

        Ok(Outcome::Uploaded {
            source: triple.tab,
            destination,
        })
    }

    async fn afterrun(&mut self, project: &str) -> Result<()> {
        let Some(email) = self.config.email.as_deref() else {
            return Ok(());
        };
        if self.report.is_empty() {
            tracing::debug!("Nothing to report for project {}", project);
            return Ok(());
        }

        self.notifier
            .send(
                email,
                &report_subject(&self.config.module_name),
                &self.report.render(),
            )
            .await
    }
}
