use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

use crate::common::errors::BackupError;

/// Outcome of one retention pass over the backup directory
#[derive(Debug, Default)]
pub struct PruneReport {
    pub removed: Vec<PathBuf>,
    pub bytes_freed: u64,
    pub errors: Vec<BackupError>,
}

/// Apply the retention policy to `dir`.
///
/// Keep mode (`keep_local = true`) deletes every entry whose filename starts
/// with `prefix` and whose mtime is older than `keep_days` days. Purge mode
/// deletes every entry starting with `prefix + "_"`, whatever its age.
/// Candidates come from a directory scan, not from this run's artifact list,
/// so leftovers from earlier runs are pruned too.
pub fn prune(
    dir: &Path,
    prefix: &str,
    keep_local: bool,
    keep_days: u32,
) -> Result<PruneReport, BackupError> {
    prune_at(SystemTime::now(), dir, prefix, keep_local, keep_days)
}

/// Prune against an explicit notion of "now"
pub fn prune_at(
    now: SystemTime,
    dir: &Path,
    prefix: &str,
    keep_local: bool,
    keep_days: u32,
) -> Result<PruneReport, BackupError> {
    let mut report = PruneReport::default();

    for path in prune_candidates_at(now, dir, prefix, keep_local, keep_days)? {
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "removed archive");
                report.bytes_freed += size;
                report.removed.push(path);
            }
            Err(e) => {
                // one bad file must not stop the rest of the scan
                report.errors.push(BackupError::Io { path, source: e });
            }
        }
    }

    Ok(report)
}

/// What `prune` would delete right now, without deleting it
pub fn prune_candidates(
    dir: &Path,
    prefix: &str,
    keep_local: bool,
    keep_days: u32,
) -> Result<Vec<PathBuf>, BackupError> {
    prune_candidates_at(SystemTime::now(), dir, prefix, keep_local, keep_days)
}

pub fn prune_candidates_at(
    now: SystemTime,
    dir: &Path,
    prefix: &str,
    keep_local: bool,
    keep_days: u32,
) -> Result<Vec<PathBuf>, BackupError> {
    let entries = fs::read_dir(dir).map_err(|e| BackupError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut candidates = Vec::new();

    if keep_local {
        // keep mode: age threshold, matched on the bare prefix
        let threshold = Duration::from_secs(u64::from(keep_days) * 86_400);
        let Some(cutoff) = now.checked_sub(threshold) else {
            // keep_days reaches past the epoch; nothing can be that old
            return Ok(candidates);
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(prefix) {
                continue;
            }
            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(t) => t,
                Err(e) => {
                    // unknown mtime: treat as fresh and leave it alone
                    debug!(path = %entry.path().display(), error = %e, "mtime unreadable, keeping");
                    continue;
                }
            };
            if modified < cutoff {
                candidates.push(entry.path());
            }
        }
    } else {
        // purge mode: everything of this run's naming scheme goes
        let pattern = format!("{}_", prefix);
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&pattern) {
                candidates.push(entry.path());
            }
        }
    }

    Ok(candidates)
}
