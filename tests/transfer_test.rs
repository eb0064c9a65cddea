use std::net::TcpListener;
use std::path::PathBuf;

use volback::common::config::SftpConfig;
use volback::common::errors::BackupError;
use volback::transfer::sftp::upload_all;

fn local_config(port: u16) -> SftpConfig {
    SftpConfig {
        enabled: true,
        host: "127.0.0.1".to_string(),
        port,
        username: "backup".to_string(),
        password: "secret".to_string(),
        use_key: false,
        key_file: None,
        remote_dir: "backups".to_string(),
    }
}

#[test]
fn test_empty_batch_never_connects() {
    // host/port are bogus; with nothing queued no connection is attempted
    let config = local_config(1);
    let report = upload_all(&config, &[]);
    assert!(report.succeeded());
    assert!(report.uploaded.is_empty());
}

#[test]
fn test_unreachable_endpoint_is_a_connect_error() {
    // grab a free port, then close it again so nothing is listening
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = local_config(port);
    let artifacts = vec![PathBuf::from("/tmp/bkp_app_20240101.tar")];
    let report = upload_all(&config, &artifacts);

    assert!(report.uploaded.is_empty());
    assert_eq!(report.bytes_sent, 0);
    assert!(matches!(
        report.error,
        Some(BackupError::TransferConnect { .. })
    ));
    assert!(report.error.as_ref().unwrap().is_transfer());
}

#[test]
fn test_non_ssh_endpoint_fails_the_handshake() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = std::thread::spawn(move || {
        // accept and hang up without speaking SSH
        if let Ok((stream, _)) = listener.accept() {
            drop(stream);
        }
    });

    let config = local_config(port);
    let artifacts = vec![PathBuf::from("/tmp/bkp_app_20240101.tar")];
    let report = upload_all(&config, &artifacts);

    server.join().unwrap();
    assert!(report.uploaded.is_empty());
    assert!(matches!(
        report.error,
        Some(BackupError::TransferConnect { .. })
    ));
}
