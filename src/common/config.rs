use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::errors::BackupError;

/// Global volback configuration
///
/// All values are static for the duration of a run; there is no runtime
/// reconfiguration. Loaded from `~/.volback/config.toml` unless a path is
/// given with `--config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory where volume archives are written and kept
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    /// Archive name prefix; files are named `<prefix>_<volume>_<YYYYMMDD>.tar`
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Container engine binary: podman, docker, or a full path
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Keep local archives between runs; false purges every archive of this
    /// prefix at the end of each run
    #[serde(default = "default_keep_local")]
    pub keep_local: bool,

    /// Days to keep local archives before pruning (used with keep_local)
    #[serde(default = "default_keep_days")]
    pub keep_days: u32,

    /// Only back up volumes whose name contains one of these substrings.
    /// When set, exclude_patterns is not consulted.
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Skip volumes whose name contains one of these substrings
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Shell commands to run before the export stage
    #[serde(default)]
    pub pre_commands: HookConfig,

    /// Shell commands to run after the upload stage
    #[serde(default)]
    pub post_commands: HookConfig,

    #[serde(default)]
    pub sftp: SftpConfig,
}

/// A batch of shell commands run around the backup stages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Each entry is run as `sh -c <command>`, in order
    #[serde(default)]
    pub commands: Vec<String>,
}

/// Remote offload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SftpConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub host: String,

    #[serde(default = "default_sftp_port")]
    pub port: u16,

    /// Remote user, used with both password and key authentication
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Authenticate with a private key file instead of a password
    #[serde(default)]
    pub use_key: bool,

    /// Private key path, required when use_key is set
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Destination directory on the remote server
    #[serde(default)]
    pub remote_dir: String,
}

fn default_backup_dir() -> PathBuf {
    Config::data_dir().join("backups")
}
fn default_file_prefix() -> String {
    "volumes".to_string()
}
fn default_engine() -> String {
    "podman".to_string()
}
fn default_keep_local() -> bool {
    true
}
fn default_keep_days() -> u32 {
    20
}
fn default_sftp_port() -> u16 {
    22
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_dir: default_backup_dir(),
            file_prefix: default_file_prefix(),
            engine: default_engine(),
            keep_local: default_keep_local(),
            keep_days: default_keep_days(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            pre_commands: HookConfig::default(),
            post_commands: HookConfig::default(),
            sftp: SftpConfig::default(),
        }
    }
}

impl Default for SftpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            port: default_sftp_port(),
            username: String::new(),
            password: String::new(),
            use_key: false,
            key_file: None,
            remote_dir: String::new(),
        }
    }
}

impl Config {
    /// Get the volback data directory (~/.volback)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".volback")
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load config from the given file, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config.normalized())
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the given file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Create the data directory and the backup directory
    pub fn init_dirs(&self) -> Result<()> {
        for dir in [&Self::data_dir(), &self.backup_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Drop the config quirks a hand-edited file can carry: empty-string
    /// patterns (an empty pattern matches every volume name) and an empty
    /// remote directory (meaning the session's starting directory).
    fn normalized(mut self) -> Self {
        self.include_patterns.retain(|p| !p.is_empty());
        self.exclude_patterns.retain(|p| !p.is_empty());
        if self.sftp.enabled && self.sftp.remote_dir.is_empty() {
            self.sftp.remote_dir = ".".to_string();
        }
        self
    }

    /// Check the config is usable. Hard problems come back as an error;
    /// suspicious-but-legal combinations come back as warnings.
    pub fn validate(&self) -> std::result::Result<Vec<String>, BackupError> {
        if self.file_prefix.is_empty() {
            return Err(BackupError::Config {
                message: "file_prefix must not be empty".to_string(),
            });
        }
        if self.file_prefix.contains('/') || self.file_prefix.contains('\0') {
            return Err(BackupError::Config {
                message: "file_prefix must not contain '/' or null".to_string(),
            });
        }
        if self.engine.is_empty() {
            return Err(BackupError::Config {
                message: "engine must not be empty".to_string(),
            });
        }

        if self.sftp.enabled {
            if self.sftp.host.is_empty() {
                return Err(BackupError::Config {
                    message: "sftp.host is required when sftp.enabled is set".to_string(),
                });
            }
            if self.sftp.username.is_empty() {
                return Err(BackupError::Config {
                    message: "sftp.username is required when sftp.enabled is set".to_string(),
                });
            }
            if self.sftp.use_key {
                if self.sftp.key_file.is_none() {
                    return Err(BackupError::Config {
                        message: "sftp.key_file is required when sftp.use_key is set".to_string(),
                    });
                }
            } else if self.sftp.password.is_empty() {
                return Err(BackupError::Config {
                    message: "sftp.password is required when sftp.use_key is not set".to_string(),
                });
            }
        }

        let mut warnings = Vec::new();
        if !self.include_patterns.is_empty() && !self.exclude_patterns.is_empty() {
            warnings.push(
                "both include_patterns and exclude_patterns are set; \
                 exclude_patterns is ignored while include_patterns is non-empty"
                    .to_string(),
            );
        }
        if !self.keep_local && !self.sftp.enabled {
            warnings.push(
                "keep_local = false with sftp disabled: every archive is deleted \
                 at the end of the run"
                    .to_string(),
            );
        }
        Ok(warnings)
    }

    /// Apply a `config set` assignment
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "backup_dir" => self.backup_dir = PathBuf::from(value),
            "file_prefix" => self.file_prefix = value.to_string(),
            "engine" => self.engine = value.to_string(),
            "keep_local" => self.keep_local = value.parse()?,
            "keep_days" => self.keep_days = value.parse()?,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine, "podman");
        assert_eq!(config.file_prefix, "volumes");
        assert!(config.keep_local);
        assert_eq!(config.keep_days, 20);
        assert_eq!(config.sftp.port, 22);
        assert!(!config.sftp.enabled);
        assert!(config.include_patterns.is_empty());
        assert!(config.validate().unwrap().is_empty());
    }

    #[test]
    fn test_parse_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            file_prefix = "bkp"

            [sftp]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.file_prefix, "bkp");
        assert_eq!(config.engine, "podman");
        assert_eq!(config.sftp.port, 22);
    }

    #[test]
    fn test_normalized_drops_empty_patterns() {
        let config: Config = toml::from_str(
            r#"
            include_patterns = ["", "db"]
            exclude_patterns = [""]
            "#,
        )
        .unwrap();
        let config = config.normalized();
        assert_eq!(config.include_patterns, vec!["db".to_string()]);
        assert!(config.exclude_patterns.is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let mut config = Config::default();
        config.file_prefix = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_sftp_credentials() {
        let mut config = Config::default();
        config.sftp.enabled = true;
        config.sftp.host = "backup.example.com".to_string();
        config.sftp.username = "backup".to_string();
        // no password, no key
        assert!(config.validate().is_err());

        config.sftp.password = "secret".to_string();
        assert!(config.validate().is_ok());

        config.sftp.use_key = true;
        assert!(config.validate().is_err());
        config.sftp.key_file = Some(PathBuf::from("/etc/volback/id_ed25519"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_warns_on_both_pattern_lists() {
        let mut config = Config::default();
        config.include_patterns = vec!["db".to_string()];
        config.exclude_patterns = vec!["tmp".to_string()];
        let warnings = config.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("exclude_patterns is ignored"));
    }

    #[test]
    fn test_validate_warns_on_purge_without_upload() {
        let mut config = Config::default();
        config.keep_local = false;
        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.contains("keep_local")));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.include_patterns = vec!["db".to_string()];
        config.sftp.host = "backup.example.com".to_string();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.include_patterns, config.include_patterns);
        assert_eq!(parsed.sftp.host, config.sftp.host);
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("keep_days", "30").unwrap();
        assert_eq!(config.keep_days, 30);
        config.set_value("engine", "docker").unwrap();
        assert_eq!(config.engine, "docker");
        assert!(config.set_value("bogus", "1").is_err());
    }
}
