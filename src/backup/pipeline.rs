use chrono::Local;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::backup::exporter::{self, ExportReport};
use crate::backup::hooks::{self, HookReport};
use crate::backup::naming;
use crate::backup::retention::{self, PruneReport};
use crate::backup::selector::BackupDecision;
use crate::common::config::Config;
use crate::common::errors::BackupError;
use crate::transfer::sftp::{self, UploadReport};

/// Everything one pipeline run did, stage by stage.
///
/// A `None` stage was not configured for this run; a present report may
/// still carry its own errors. Stage-level failures (a stage that could not
/// run at all) land in `stage_errors`.
#[derive(Debug, Default)]
pub struct RunReport {
    pub pre: Option<HookReport>,
    pub export: Option<ExportReport>,
    pub upload: Option<UploadReport>,
    pub post: Option<HookReport>,
    pub prune: Option<PruneReport>,
    pub stage_errors: Vec<BackupError>,
    pub duration_secs: f64,
}

impl RunReport {
    /// True when no stage recorded any failure
    pub fn clean(&self) -> bool {
        self.stage_errors.is_empty()
            && self.pre.as_ref().map_or(true, |r| r.all_succeeded())
            && self.export.as_ref().map_or(true, |r| r.errors.is_empty())
            && self.upload.as_ref().map_or(true, |r| r.succeeded())
            && self.post.as_ref().map_or(true, |r| r.all_succeeded())
            && self.prune.as_ref().map_or(true, |r| r.errors.is_empty())
    }
}

/// Run the full pipeline: pre-commands, discovery & export, upload,
/// post-commands, retention.
///
/// Best-effort, not a transaction: every stage's failure is caught, logged,
/// and recorded, and the next stage still runs. The caller always gets a
/// complete report back.
pub fn run(config: &Config) -> RunReport {
    let started = Instant::now();
    let mut report = RunReport::default();

    if config.pre_commands.enabled {
        info!("running pre-backup commands");
        report.pre = Some(hooks::run_commands(&config.pre_commands.commands));
    }

    if let Err(e) = std::fs::create_dir_all(&config.backup_dir) {
        report.stage_errors.push(BackupError::Io {
            path: config.backup_dir.clone(),
            source: e,
        });
    }

    let today = Local::now().date_naive();
    match exporter::export_volumes(config, today, config.sftp.enabled) {
        Ok(export) => report.export = Some(export),
        Err(e) => {
            error!(error = %e, "export stage failed");
            report.stage_errors.push(e);
        }
    }

    if config.sftp.enabled {
        let artifacts: &[PathBuf] = report
            .export
            .as_ref()
            .map(|e| e.artifacts.as_slice())
            .unwrap_or(&[]);
        info!(count = artifacts.len(), "uploading artifacts");
        report.upload = Some(sftp::upload_all(&config.sftp, artifacts));
    }

    if config.post_commands.enabled {
        info!("running post-backup commands");
        report.post = Some(hooks::run_commands(&config.post_commands.commands));
    }

    match retention::prune(
        &config.backup_dir,
        &config.file_prefix,
        config.keep_local,
        config.keep_days,
    ) {
        Ok(prune) => report.prune = Some(prune),
        Err(e) => {
            error!(error = %e, "retention stage failed");
            report.stage_errors.push(e);
        }
    }

    report.duration_secs = started.elapsed().as_secs_f64();
    report
}

/// What a run would do, computed without exporting, uploading, running
/// hooks, or deleting anything
#[derive(Debug, Default)]
pub struct PlanReport {
    /// Every discovered volume with its include/skip decision
    pub volumes: Vec<(String, BackupDecision)>,

    /// Archive paths a run today would write
    pub artifacts: Vec<PathBuf>,

    /// What the retention stage would delete from the backup directory
    /// as it stands now (before any new exports land in it)
    pub prune_candidates: Vec<PathBuf>,
}

pub fn plan(config: &Config) -> Result<PlanReport, BackupError> {
    let today = Local::now().date_naive();
    let volumes = exporter::plan_volumes(config)?;

    let artifacts = volumes
        .iter()
        .filter(|(_, decision)| *decision == BackupDecision::Include)
        .map(|(volume, _)| {
            naming::artifact_path(&config.backup_dir, &config.file_prefix, volume, today)
        })
        .collect();

    let prune_candidates = match retention::prune_candidates(
        &config.backup_dir,
        &config.file_prefix,
        config.keep_local,
        config.keep_days,
    ) {
        Ok(candidates) => candidates,
        Err(e) => {
            debug!(error = %e, "backup directory not scannable yet");
            Vec::new()
        }
    };

    Ok(PlanReport {
        volumes,
        artifacts,
        prune_candidates,
    })
}
