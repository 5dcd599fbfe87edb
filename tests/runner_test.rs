mod common;

use common::{RecordingNotifier, RecordingScan, stage_edat};
use edat_uploader::{EDAT_RESOURCE, EdatModule, ModuleConfig, ModuleRunner, RunSummary};
use std::sync::Arc;

#[tokio::test]
async fn test_run_project_gates_and_uploads() {
    let dir = tempfile::tempdir().unwrap();
    stage_edat(dir.path(), "Emotion Dot-Probe 08-30-12-101-1.edat2");
    stage_edat(dir.path(), "estroop_DepMIND-101-1.edat2");

    let config = ModuleConfig::default().with_limbo(dir.path());
    let mut runner = ModuleRunner::new(EdatModule::new(
        config,
        Arc::new(RecordingNotifier::default()),
    ));

    let scans = vec![
        RecordingScan::new("fMRI_EDP", "101", "101a"),
        RecordingScan::new("fMRI_EmoStroop", "101", "101a").with_resource(EDAT_RESOURCE),
        RecordingScan::new("T1", "101", "101a"),
        RecordingScan::new("fMRI_Posner", "101", "101a"),
    ];

    let summary = runner.run_project("DepMIND", "", &scans).await.unwrap();
    assert_eq!(
        summary,
        RunSummary {
            checked: 4,
            processed: 2,
            uploaded: 1,
            failed: 0,
        }
    );
    assert_eq!(scans[0].uploads().len(), 1);
    assert!(scans[1].uploads().is_empty());
    assert!(scans[3].uploads().is_empty());
    assert!(runner.module().report().is_empty());
}

#[tokio::test]
async fn test_failures_are_reported_and_mailed() {
    let dir = tempfile::tempdir().unwrap();
    stage_edat(dir.path(), "Emotion Dot-Probe 08-30-12-101-1.edat2");
    stage_edat(dir.path(), "Emotion Dot-Probe 08-30-12-102-1.edat2");

    let notifier = Arc::new(RecordingNotifier::default());
    let config = ModuleConfig::default()
        .with_limbo(dir.path())
        .with_email("lab@example.org");
    let mut runner = ModuleRunner::new(EdatModule::new(config, notifier.clone()));

    let scans = vec![
        RecordingScan::new("fMRI_EDP", "101", "101a").failing(),
        RecordingScan::new("fMRI_EDP", "102", "102a"),
    ];

    let summary = runner.run_project("DepMIND", "", &scans).await.unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.uploaded, 1);

    let report = runner.module().report();
    assert_eq!(report.lines().len(), 1);
    assert!(report.lines()[0].contains("connection reset"));

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "lab@example.org");
    assert_eq!(sent[0].1, "**edat_limbo2xnat** report");
    assert!(sent[0].2.starts_with("ERROR in module edat_limbo2xnat:\n"));
}

#[tokio::test]
async fn test_no_mail_without_address_or_errors() {
    let dir = tempfile::tempdir().unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let config = ModuleConfig::default().with_limbo(dir.path());
    let mut runner = ModuleRunner::new(EdatModule::new(config, notifier.clone()));
    let scans = vec![RecordingScan::new("fMRI_EDP", "101", "101a").failing()];
    stage_edat(dir.path(), "Emotion Dot-Probe 08-30-12-101-1.edat2");
    runner.run_project("DepMIND", "", &scans).await.unwrap();
    assert!(notifier.sent.lock().unwrap().is_empty());

    let notifier = Arc::new(RecordingNotifier::default());
    let config = ModuleConfig::default()
        .with_limbo(dir.path())
        .with_email("lab@example.org");
    let mut runner = ModuleRunner::new(EdatModule::new(config, notifier.clone()));
    let scans = vec![RecordingScan::new("fMRI_EDP", "101", "101a")];
    runner.run_project("DepMIND", "", &scans).await.unwrap();
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_scans_never_reach_matching() {
    let dir = tempfile::tempdir().unwrap();
    stage_edat(dir.path(), "Emotion Dot-Probe 08-30-12-101-1.edat2");
    stage_edat(dir.path(), "t1-101-1.edat2");

    let mut config = ModuleConfig::from_lookup(|key| match key {
        "EDAT_SCAN_MAP" => Some(r#"{"T1": "t1-{SUBJ}-*.edat2"}"#.to_string()),
        _ => None,
    })
    .unwrap()
    .with_limbo(dir.path());
    config.directory = dir.path().join("work");
    let mut runner = ModuleRunner::new(EdatModule::new(
        config,
        Arc::new(RecordingNotifier::default()),
    ));

    let scans = vec![
        RecordingScan::new("T1", "101", "101a"),
        RecordingScan::new("fMRI_EDP", "101", "101a").with_resource(EDAT_RESOURCE),
    ];

    let summary = runner.run_project("DepMIND", "", &scans).await.unwrap();
    assert_eq!(summary.checked, 2);
    assert_eq!(summary.processed, 0);
    assert!(scans.iter().all(|scan| scan.uploads().is_empty()));
    assert_eq!(scans[0].resource_queries(), 0);
    assert_eq!(scans[1].resource_queries(), 1);
}
