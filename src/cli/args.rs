use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// volback: scheduled container volume backup
#[derive(Parser, Debug)]
#[command(
    name = "volback",
    version,
    about = "Back up container volumes to tar archives, offload over SFTP, prune by age",
    long_about = "volback lists the named volumes of a container engine (podman or\n\
                  docker), exports the ones selected by include/exclude patterns to\n\
                  tar archives, optionally uploads them to an SFTP server, and prunes\n\
                  the local backup directory by a retention policy. Designed to run\n\
                  unattended from cron or a systemd timer.",
    after_help = "EXAMPLES:\n  \
        volback run                            Full backup pipeline\n  \
        volback run --dry-run                  Show what a run would do\n  \
        volback volumes                        List volumes and their decisions\n  \
        volback prune                          Apply the retention policy now\n  \
        volback prune --dry-run                Show what pruning would delete\n  \
        volback config init                    Write a default config file\n  \
        volback config set keep_days 30        Tune retention"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use (default: ~/.volback/config.toml)
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full backup pipeline
    Run {
        /// Show what would be exported, uploaded, and pruned; change nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// List discovered volumes and their include/skip decision
    Volumes,

    /// Apply the retention policy to the backup directory
    Prune {
        /// Show what would be deleted without deleting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Initialize the config file and backup directory
    Init,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
