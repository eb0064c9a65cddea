use chrono::NaiveDate;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use volback::backup::exporter::{export_volumes, plan_volumes};
use volback::backup::selector::BackupDecision;
use volback::common::config::Config;
use volback::common::errors::BackupError;

/// Write a minimal engine stand-in that answers `--version`,
/// `volume list --format {{.Name}}`, and `volume export --output <dest> <name>`
fn write_stub_engine(dir: &Path, volumes: &[&str], failing_volume: Option<&str>) -> PathBuf {
    let script = dir.join("stub-engine");
    let mut body = String::from("#!/bin/sh\n");
    body.push_str("if [ \"$1\" = \"--version\" ]; then echo stub-engine 1.0; exit 0; fi\n");
    body.push_str("if [ \"$1\" = \"volume\" ] && [ \"$2\" = \"list\" ]; then\n");
    for volume in volumes {
        body.push_str(&format!("  echo {}\n", volume));
    }
    body.push_str("  exit 0\nfi\n");
    body.push_str("if [ \"$1\" = \"volume\" ] && [ \"$2\" = \"export\" ]; then\n");
    if let Some(bad) = failing_volume {
        body.push_str(&format!(
            "  if [ \"$5\" = \"{}\" ]; then echo \"no such volume\" >&2; exit 125; fi\n",
            bad
        ));
    }
    body.push_str("  echo stub-tar-data > \"$4\"\n  exit 0\nfi\n");
    body.push_str("exit 64\n");

    std::fs::write(&script, body).unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();
    script
}

fn stub_config(engine: &Path, backup_dir: &Path) -> Config {
    let mut config = Config::default();
    config.engine = engine.display().to_string();
    config.backup_dir = backup_dir.to_path_buf();
    config.file_prefix = "bkp".to_string();
    config
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_exports_every_volume_when_unfiltered() {
    let dir = TempDir::new().unwrap();
    let engine = write_stub_engine(dir.path(), &["app", "db"], None);
    let backup_dir = dir.path().join("backups");
    std::fs::create_dir(&backup_dir).unwrap();
    let config = stub_config(&engine, &backup_dir);

    let report = export_volumes(&config, date(2024, 1, 1), false).unwrap();

    assert_eq!(report.exported, vec!["app", "db"]);
    assert!(report.skipped.is_empty());
    assert!(report.errors.is_empty());
    assert!(backup_dir.join("bkp_app_20240101.tar").exists());
    assert!(backup_dir.join("bkp_db_20240101.tar").exists());
}

#[test]
fn test_include_filter_limits_export() {
    let dir = TempDir::new().unwrap();
    let engine = write_stub_engine(dir.path(), &["app", "db"], None);
    let backup_dir = dir.path().join("backups");
    std::fs::create_dir(&backup_dir).unwrap();
    let mut config = stub_config(&engine, &backup_dir);
    config.include_patterns = vec!["db".to_string()];

    let report = export_volumes(&config, date(2024, 1, 1), false).unwrap();

    assert_eq!(report.exported, vec!["db"]);
    assert_eq!(report.skipped, vec!["app"]);
    assert!(!backup_dir.join("bkp_app_20240101.tar").exists());
    assert!(backup_dir.join("bkp_db_20240101.tar").exists());
}

#[test]
fn test_artifacts_queued_only_when_upload_enabled() {
    let dir = TempDir::new().unwrap();
    let engine = write_stub_engine(dir.path(), &["app"], None);
    let backup_dir = dir.path().join("backups");
    std::fs::create_dir(&backup_dir).unwrap();
    let config = stub_config(&engine, &backup_dir);

    let without = export_volumes(&config, date(2024, 1, 1), false).unwrap();
    assert!(without.artifacts.is_empty());
    assert_eq!(without.exported, vec!["app"]);

    let with = export_volumes(&config, date(2024, 1, 1), true).unwrap();
    assert_eq!(
        with.artifacts,
        vec![backup_dir.join("bkp_app_20240101.tar")]
    );
}

#[test]
fn test_continues_past_failing_volume() {
    let dir = TempDir::new().unwrap();
    let engine = write_stub_engine(dir.path(), &["app", "db"], Some("app"));
    let backup_dir = dir.path().join("backups");
    std::fs::create_dir(&backup_dir).unwrap();
    let config = stub_config(&engine, &backup_dir);

    let report = export_volumes(&config, date(2024, 1, 1), false).unwrap();

    assert_eq!(report.exported, vec!["db"]);
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(
        report.errors[0],
        BackupError::CommandFailed { .. }
    ));
    assert!(backup_dir.join("bkp_db_20240101.tar").exists());
}

#[test]
fn test_missing_engine_fails_the_stage() {
    let dir = TempDir::new().unwrap();
    let mut config = stub_config(Path::new("volback-no-such-engine"), dir.path());
    config.file_prefix = "bkp".to_string();

    let err = export_volumes(&config, date(2024, 1, 1), false).unwrap_err();
    assert!(matches!(err, BackupError::EngineUnavailable { .. }));
}

#[test]
fn test_plan_lists_decisions_without_exporting() {
    let dir = TempDir::new().unwrap();
    let engine = write_stub_engine(dir.path(), &["app", "db"], None);
    let backup_dir = dir.path().join("backups");
    std::fs::create_dir(&backup_dir).unwrap();
    let mut config = stub_config(&engine, &backup_dir);
    config.include_patterns = vec!["db".to_string()];

    let volumes = plan_volumes(&config).unwrap();

    assert_eq!(
        volumes,
        vec![
            ("app".to_string(), BackupDecision::Skip),
            ("db".to_string(), BackupDecision::Include),
        ]
    );
    assert!(std::fs::read_dir(&backup_dir).unwrap().next().is_none());
}
