use ssh2::Session;
use std::fs::File;
use std::io;
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::common::config::SftpConfig;
use crate::common::errors::BackupError;

/// Outcome of one upload batch
#[derive(Debug, Default)]
pub struct UploadReport {
    /// Artifacts fully uploaded, in order
    pub uploaded: Vec<PathBuf>,

    pub bytes_sent: u64,

    /// The failure that aborted the batch, if any. Artifacts uploaded before
    /// it stay on the remote; nothing is rolled back or retried.
    pub error: Option<BackupError>,
}

impl UploadReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Upload every artifact over a single authenticated session.
///
/// One TCP connection, one SSH handshake, one SFTP channel for the whole
/// batch. The first failure (connect, auth, missing remote directory, or
/// any individual transfer) aborts the remaining uploads and lands in the
/// report as one batch-level error.
pub fn upload_all(config: &SftpConfig, artifacts: &[PathBuf]) -> UploadReport {
    let mut report = UploadReport::default();

    if artifacts.is_empty() {
        info!("no artifacts queued, skipping upload");
        return report;
    }

    let session = match open_session(config) {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "could not open sftp session");
            report.error = Some(e);
            return report;
        }
    };

    let sftp = match session.sftp() {
        Ok(sftp) => sftp,
        Err(e) => {
            report.error = Some(BackupError::TransferConnect {
                host: config.host.clone(),
                port: config.port,
                detail: format!("sftp channel: {}", e),
            });
            return report;
        }
    };

    let remote_dir = Path::new(&config.remote_dir);
    if let Err(e) = sftp.stat(remote_dir) {
        report.error = Some(BackupError::TransferRemoteDir {
            path: config.remote_dir.clone(),
            detail: e.to_string(),
        });
        return report;
    }

    for artifact in artifacts {
        match put_file(&sftp, remote_dir, artifact) {
            Ok(bytes) => {
                info!(artifact = %artifact.display(), bytes, "uploaded");
                report.bytes_sent += bytes;
                report.uploaded.push(artifact.clone());
            }
            Err(e) => {
                warn!(artifact = %artifact.display(), error = %e, "upload failed, aborting batch");
                report.error = Some(e);
                break;
            }
        }
    }

    report
}

fn open_session(config: &SftpConfig) -> Result<Session, BackupError> {
    let connect_err = |detail: String| BackupError::TransferConnect {
        host: config.host.clone(),
        port: config.port,
        detail,
    };

    let tcp = TcpStream::connect((config.host.as_str(), config.port))
        .map_err(|e| connect_err(e.to_string()))?;

    let mut session = Session::new().map_err(|e| connect_err(e.to_string()))?;
    session.set_tcp_stream(tcp);
    session
        .handshake()
        .map_err(|e| connect_err(format!("handshake: {}", e)))?;

    let auth_err = |detail: String| BackupError::TransferAuth {
        username: config.username.clone(),
        detail,
    };

    if config.use_key {
        let key_file = config
            .key_file
            .as_deref()
            .ok_or_else(|| auth_err("no key file configured".to_string()))?;
        session
            .userauth_pubkey_file(&config.username, None, key_file, None)
            .map_err(|e| auth_err(e.to_string()))?;
    } else {
        session
            .userauth_password(&config.username, &config.password)
            .map_err(|e| auth_err(e.to_string()))?;
    }

    if !session.authenticated() {
        return Err(auth_err("server rejected credentials".to_string()));
    }

    Ok(session)
}

fn put_file(sftp: &ssh2::Sftp, remote_dir: &Path, artifact: &Path) -> Result<u64, BackupError> {
    let upload_err = |detail: String| BackupError::TransferUpload {
        path: artifact.to_path_buf(),
        detail,
    };

    let mut local = File::open(artifact)
        .map_err(|e| upload_err(format!("cannot open local file: {}", e)))?;

    let file_name = artifact
        .file_name()
        .ok_or_else(|| upload_err("artifact has no file name".to_string()))?;
    let remote_path = remote_dir.join(file_name);

    let mut remote = sftp
        .create(&remote_path)
        .map_err(|e| upload_err(e.to_string()))?;

    io::copy(&mut local, &mut remote).map_err(|e| upload_err(e.to_string()))
}
