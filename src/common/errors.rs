use std::path::PathBuf;
use thiserror::Error;

/// Typed error values for the backup pipeline.
/// We use `anyhow` at the top level for CLI error handling, but every stage
/// reports its failures with these variants so callers and tests can tell an
/// external-command failure from a transfer failure from a filesystem one.

#[derive(Debug, Error)]
pub enum BackupError {
    /// The container engine binary is missing or not answering
    #[error("container engine '{engine}' is not available")]
    EngineUnavailable { engine: String },

    /// An external command could not be started at all
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command ran and exited non-zero
    #[error("'{command}' failed: {detail}")]
    CommandFailed { command: String, detail: String },

    /// TCP connect or SSH handshake failed
    #[error("sftp connection to {host}:{port} failed: {detail}")]
    TransferConnect {
        host: String,
        port: u16,
        detail: String,
    },

    /// The remote server rejected our credentials
    #[error("sftp authentication failed for '{username}': {detail}")]
    TransferAuth { username: String, detail: String },

    /// The remote destination directory is missing or unreadable
    #[error("remote directory '{path}' is not accessible: {detail}")]
    TransferRemoteDir { path: String, detail: String },

    /// A single file transfer failed mid-batch
    #[error("upload of '{}' failed: {detail}", .path.display())]
    TransferUpload { path: PathBuf, detail: String },

    /// Local filesystem operation failed
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is unusable
    #[error("config error: {message}")]
    Config { message: String },
}

impl BackupError {
    /// True for the transfer family of failures (connection, auth,
    /// remote directory, individual upload)
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            BackupError::TransferConnect { .. }
                | BackupError::TransferAuth { .. }
                | BackupError::TransferRemoteDir { .. }
                | BackupError::TransferUpload { .. }
        )
    }
}
