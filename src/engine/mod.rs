//! Container engine integration
//!
//! Drives the engine the same way an operator would: `volume list` and
//! `volume export` subcommands, consuming stdout and exit status. Any binary
//! with podman's volume CLI surface works; the binary name (or full path)
//! comes from the config.

use std::path::Path;
use std::process::Command;

use crate::common::errors::BackupError;

/// Check that the engine binary exists and answers
pub fn is_engine_available(engine: &str) -> bool {
    Command::new(engine)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// List the names of all volumes known to the engine
pub fn list_volumes(engine: &str) -> Result<Vec<String>, BackupError> {
    let command = format!("{} volume list", engine);
    let output = Command::new(engine)
        .args(["volume", "list", "--format", "{{.Name}}"])
        .output()
        .map_err(|e| BackupError::Spawn {
            command: command.clone(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(BackupError::CommandFailed {
            command,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(parse_volume_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `volume list --format {{.Name}}` output: one name per line,
/// whitespace-trimmed, blank lines dropped
pub fn parse_volume_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Export one volume as a tar archive at `dest`
pub fn export_volume(engine: &str, volume: &str, dest: &Path) -> Result<(), BackupError> {
    let command = format!("{} volume export {}", engine, volume);
    let output = Command::new(engine)
        .args(["volume", "export", "--output"])
        .arg(dest)
        .arg(volume)
        .output()
        .map_err(|e| BackupError::Spawn {
            command: command.clone(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(BackupError::CommandFailed {
            command,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
