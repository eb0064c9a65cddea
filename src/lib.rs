//! # volback
//!
//! Scheduled backup of container volumes.
//!
//! volback enumerates the named volumes of a container engine (podman or
//! docker), exports a selected subset to tar archives, optionally offloads
//! the archives to an SFTP server, and prunes the local backup directory
//! according to a retention policy. It is designed to run unattended from
//! cron or a systemd timer, driven entirely by a TOML config file.
//!
//! - **Selective**: include/exclude substring filters decide per volume
//! - **Idempotent Naming**: `<prefix>_<volume>_<YYYYMMDD>.tar`, one per volume per day
//! - **Best-Effort Pipeline**: every stage runs; failures are reported, never cascaded
//! - **SFTP Offload**: one authenticated session per run, password or key file
//! - **Retention**: keep N days of archives, or purge everything after upload

pub mod backup;
pub mod cli;
pub mod common;
pub mod engine;
pub mod transfer;
