use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::Path;

use volback::backup::{exporter, pipeline, retention};
use volback::cli::args::{Cli, Commands, ConfigAction, OutputFormat};
use volback::cli::output;
use volback::common::config::Config;
use volback::common::format;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("volback=debug")
            .init();
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    match cli.command {
        Commands::Run { dry_run } => cmd_run(&cli, &config_path, dry_run),

        Commands::Volumes => cmd_volumes(&cli, &config_path),

        Commands::Prune { dry_run } => cmd_prune(&cli, &config_path, dry_run),

        Commands::Config { ref action } => cmd_config(&config_path, action),

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                volback::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                volback::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                volback::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "volback", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli, config_path: &Path) -> Result<Config> {
    let config = Config::load_from(config_path)?;
    let warnings = config.validate()?;
    if !cli.quiet && matches!(cli.format, OutputFormat::Human) {
        output::print_warnings(&warnings);
    }
    Ok(config)
}

// ─── Run ──────────────────────────────────────────────────────────────────────

fn cmd_run(cli: &Cli, config_path: &Path, dry_run: bool) -> Result<()> {
    let config = load_config(cli, config_path)?;

    if dry_run {
        let plan = pipeline::plan(&config)?;
        match cli.format {
            OutputFormat::Human => output::print_plan(&plan),
            OutputFormat::Json => output::print_plan_json(&plan),
            OutputFormat::Quiet => {
                println!(
                    "{}  {}",
                    plan.artifacts.len(),
                    plan.prune_candidates.len()
                );
            }
        }
        return Ok(());
    }

    let report = pipeline::run(&config);

    match cli.format {
        OutputFormat::Human => output::print_run_report(&report),
        OutputFormat::Json => output::print_run_json(&report),
        OutputFormat::Quiet => output::print_run_quiet(&report),
    }

    // stage failures are visible above; the run itself completed
    Ok(())
}

// ─── Volumes ──────────────────────────────────────────────────────────────────

fn cmd_volumes(cli: &Cli, config_path: &Path) -> Result<()> {
    let config = load_config(cli, config_path)?;
    let volumes = exporter::plan_volumes(&config)?;

    match cli.format {
        OutputFormat::Human => {
            println!();
            output::print_volume_list(&volumes);
        }
        OutputFormat::Json => output::print_volumes_json(&volumes),
        OutputFormat::Quiet => output::print_volumes_quiet(&volumes),
    }

    Ok(())
}

// ─── Prune ────────────────────────────────────────────────────────────────────

fn cmd_prune(cli: &Cli, config_path: &Path, dry_run: bool) -> Result<()> {
    let config = load_config(cli, config_path)?;

    if dry_run {
        let candidates = retention::prune_candidates(
            &config.backup_dir,
            &config.file_prefix,
            config.keep_local,
            config.keep_days,
        )?;
        match cli.format {
            OutputFormat::Human => {
                println!();
                if candidates.is_empty() {
                    println!("  Nothing eligible for pruning.");
                } else {
                    println!(
                        "  Would prune {}:",
                        format::format_count(candidates.len(), "archive")
                    );
                    for path in &candidates {
                        println!("    {} {}", "→".dimmed(), format::format_path(path));
                    }
                }
                println!();
            }
            OutputFormat::Json => {
                let json: Vec<String> =
                    candidates.iter().map(|p| p.display().to_string()).collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Quiet => println!("{}", candidates.len()),
        }
        return Ok(());
    }

    let report = retention::prune(
        &config.backup_dir,
        &config.file_prefix,
        config.keep_local,
        config.keep_days,
    )?;

    match cli.format {
        OutputFormat::Human => output::print_prune_report(&report),
        OutputFormat::Json => output::print_prune_json(&report),
        OutputFormat::Quiet => {
            println!(
                "{}  {}",
                report.removed.len(),
                format::format_size(report.bytes_freed)
            );
        }
    }

    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(config_path: &Path, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let config = Config::load_from(config_path)?;
            config.init_dirs()?;
            config.save_to(config_path)?;
            println!(
                "  {} volback initialized: {}",
                "✓".green(),
                format::format_path(config_path)
            );
            println!(
                "  Backup directory: {}",
                format::format_path(&config.backup_dir)
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load_from(config_path)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save_to(config_path)?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(config_path)?;
            config.set_value(key, value)?;
            config.save_to(config_path)?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}
