use crate::models::SUBJECT_PLACEHOLDER;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The staged file chosen for a scan plus its two siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTriple {
    pub edat: PathBuf,
    pub txt: PathBuf,
    pub tab: PathBuf,
}

impl UploadTriple {
    pub fn from_edat(edat: PathBuf) -> Self {
        let txt = edat.with_extension("txt");

        let mut tab: OsString = edat.clone().into_os_string();
        tab.push("_tab.txt");

        Self {
            edat,
            txt,
            tab: PathBuf::from(tab),
        }
    }
}

pub fn render_pattern(template: &str, subject_label: &str) -> String {
    template.replace(SUBJECT_PLACEHOLDER, subject_label)
}

/// Archive file name for a staged file: its base name with spaces as underscores.
pub fn destination_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().replace(' ', "_"))
        .unwrap_or_default()
}
