use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::backup::naming;
use crate::backup::selector::{self, BackupDecision};
use crate::common::config::Config;
use crate::common::errors::BackupError;
use crate::engine;

/// Outcome of the discovery-and-export stage
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Volume names successfully exported, in discovery order
    pub exported: Vec<String>,

    /// Volumes the include/exclude filters left out
    pub skipped: Vec<String>,

    /// Archive paths queued for upload, in export order. Only populated
    /// when a remote upload is configured for this run.
    pub artifacts: Vec<PathBuf>,

    /// Per-volume failures; the stage continues past each of them
    pub errors: Vec<BackupError>,
}

/// Discover volumes and export every one the selector includes.
///
/// A single bad volume must not abort the run: its error is recorded and the
/// remaining volumes are still attempted. A listing failure (or a missing
/// engine binary) fails the whole stage instead; there is nothing to iterate.
pub fn export_volumes(
    config: &Config,
    date: NaiveDate,
    queue_for_upload: bool,
) -> Result<ExportReport, BackupError> {
    if !engine::is_engine_available(&config.engine) {
        return Err(BackupError::EngineUnavailable {
            engine: config.engine.clone(),
        });
    }

    let volumes = engine::list_volumes(&config.engine)?;
    info!(count = volumes.len(), "discovered volumes");

    let mut report = ExportReport::default();

    for volume in volumes {
        match selector::decide(&volume, &config.include_patterns, &config.exclude_patterns) {
            BackupDecision::Skip => {
                debug!(volume = %volume, "filtered out");
                report.skipped.push(volume);
            }
            BackupDecision::Include => {
                let dest =
                    naming::artifact_path(&config.backup_dir, &config.file_prefix, &volume, date);
                match engine::export_volume(&config.engine, &volume, &dest) {
                    Ok(()) => {
                        info!(volume = %volume, dest = %dest.display(), "volume exported");
                        if queue_for_upload {
                            report.artifacts.push(dest);
                        }
                        report.exported.push(volume);
                    }
                    Err(e) => {
                        warn!(volume = %volume, error = %e, "volume export failed");
                        report.errors.push(e);
                    }
                }
            }
        }
    }

    Ok(report)
}

/// Discovery and selection only: every volume with its decision, in
/// discovery order. Used by `volumes` and `run --dry-run`.
pub fn plan_volumes(config: &Config) -> Result<Vec<(String, BackupDecision)>, BackupError> {
    if !engine::is_engine_available(&config.engine) {
        return Err(BackupError::EngineUnavailable {
            engine: config.engine.clone(),
        });
    }

    Ok(engine::list_volumes(&config.engine)?
        .into_iter()
        .map(|volume| {
            let decision =
                selector::decide(&volume, &config.include_patterns, &config.exclude_patterns);
            (volume, decision)
        })
        .collect())
}
