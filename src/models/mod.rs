use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name of the scan resource the uploaded task data lands in.
pub const EDAT_RESOURCE: &str = "EDAT";

/// Placeholder substituted with the subject label in a file pattern.
pub const SUBJECT_PLACEHOLDER: &str = "{SUBJ}";

/// Built-in scan type to staging file pattern table.
pub const DEFAULT_SCAN_MAP: &[(&str, &str)] = &[
    ("fMRI_EDP", "Emotion Dot-Probe 08-30-12-{SUBJ}-*.edat2"),
    ("fMRI_EmoStroop", "estroop_DepMIND-{SUBJ}-*.edat2"),
    ("fMRI_Posner", "Posner_mANT_DepMIND-{SUBJ}-*.edat2"),
    ("fMRI_NBack", "Verbal_N-back*{SUBJ}-*.edat2"),
];

/// Metadata for one scan, as handed over by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInfo {
    #[serde(rename = "type")]
    pub scan_type: String,
    pub subject_label: String,
    pub session_label: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default, rename = "ID")]
    pub scan_id: Option<String>,
}

impl ScanInfo {
    pub fn new(
        scan_type: impl Into<String>,
        subject_label: impl Into<String>,
        session_label: impl Into<String>,
    ) -> Self {
        Self {
            scan_type: scan_type.into(),
            subject_label: subject_label.into(),
            session_label: session_label.into(),
            project_id: None,
            scan_id: None,
        }
    }

    /// Short `project/session/scan` label used in logs and reports.
    pub fn label(&self) -> String {
        format!(
            "{}/{}/{}",
            self.project_id.as_deref().unwrap_or("-"),
            self.session_label,
            self.scan_id.as_deref().unwrap_or(&self.scan_type)
        )
    }
}

/// Which branch `run` took for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No pattern configured for the scan type
    UnknownType,
    /// Nothing staged for the scan yet
    NoMatch,
    /// Several staged files and no rule to pick one
    Ambiguous(usize),
    /// The mandatory `_tab.txt` sibling is missing
    MissingTab(PathBuf),
    Uploaded { source: PathBuf, destination: String },
}

impl Outcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, Outcome::Uploaded { .. })
    }
}

/// Scan type label to file pattern template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanMap(BTreeMap<String, String>);

impl Default for ScanMap {
    fn default() -> Self {
        DEFAULT_SCAN_MAP
            .iter()
            .map(|(scan_type, pattern)| (scan_type.to_string(), pattern.to_string()))
            .collect()
    }
}

impl FromIterator<(String, String)> for ScanMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ScanMap {
    pub fn pattern(&self, scan_type: &str) -> Option<&str> {
        self.0.get(scan_type).map(String::as_str)
    }

    pub fn contains(&self, scan_type: &str) -> bool {
        self.0.contains_key(scan_type)
    }

    /// Entries from `other` replace or extend this table.
    pub fn merged(mut self, other: ScanMap) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
