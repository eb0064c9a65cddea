use std::process::Command;
use tracing::{info, warn};

use crate::common::errors::BackupError;

/// Outcome of one pre- or post-backup command batch
#[derive(Debug, Default)]
pub struct HookReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub errors: Vec<BackupError>,
}

impl HookReport {
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run each command through `sh -c`, in order, blocking on each.
///
/// A failing command is recorded and the batch moves on to the next one;
/// nothing here aborts the run.
pub fn run_commands(commands: &[String]) -> HookReport {
    let mut report = HookReport::default();

    for command in commands {
        report.attempted += 1;
        match Command::new("sh").arg("-c").arg(command).status() {
            Ok(status) if status.success() => {
                info!(command = %command, "command finished");
                report.succeeded += 1;
            }
            Ok(status) => {
                warn!(command = %command, %status, "command failed");
                report.errors.push(BackupError::CommandFailed {
                    command: command.clone(),
                    detail: status.to_string(),
                });
            }
            Err(e) => {
                warn!(command = %command, error = %e, "command could not be started");
                report.errors.push(BackupError::Spawn {
                    command: command.clone(),
                    source: e,
                });
            }
        }
    }

    report
}
