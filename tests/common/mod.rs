#![allow(dead_code)]

use edat_uploader::{ModuleError, Notifier, Result, ScanHandle, ScanInfo};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub resource: String,
    pub dst_name: String,
    pub src: PathBuf,
    pub overwrite: bool,
}

/// Scan handle that records uploads instead of sending them.
pub struct RecordingScan {
    pub info: ScanInfo,
    pub resources: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<Upload>>,
    pub resource_queries: AtomicUsize,
    pub fail_uploads: bool,
}

impl RecordingScan {
    pub fn new(scan_type: &str, subject: &str, session: &str) -> Self {
        Self {
            info: ScanInfo::new(scan_type, subject, session),
            resources: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            resource_queries: AtomicUsize::new(0),
            fail_uploads: false,
        }
    }

    pub fn with_resource(self, resource: &str) -> Self {
        self.resources.lock().unwrap().push(resource.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn resource_queries(&self) -> usize {
        self.resource_queries.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ScanHandle for RecordingScan {
    fn info(&self) -> ScanInfo {
        self.info.clone()
    }

    async fn has_resource(&self, resource: &str) -> Result<bool> {
        self.resource_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.resources.lock().unwrap().iter().any(|r| r == resource))
    }

    async fn put_resource_file(
        &self,
        resource: &str,
        dst_name: &str,
        src: &Path,
        overwrite: bool,
    ) -> Result<()> {
        if self.fail_uploads {
            return Err(ModuleError::Archive("connection reset".to_string()));
        }
        self.uploads.lock().unwrap().push(Upload {
            resource: resource.to_string(),
            dst_name: dst_name.to_string(),
            src: src.to_path_buf(),
            overwrite,
        });
        let mut resources = self.resources.lock().unwrap();
        if !resources.iter().any(|r| r == resource) {
            resources.push(resource.to_string());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"Subject\tTrial\n101\t1\n").unwrap();
    path
}

/// Stages an export with both siblings present.
pub fn stage_edat(dir: &Path, name: &str) -> PathBuf {
    let edat = touch(dir, name);
    touch(dir, &format!("{}_tab.txt", name));
    let stem = Path::new(name).file_stem().unwrap().to_string_lossy().to_string();
    touch(dir, &format!("{}.txt", stem));
    edat
}
