use colored::*;

use crate::backup::exporter::ExportReport;
use crate::backup::hooks::HookReport;
use crate::backup::pipeline::{PlanReport, RunReport};
use crate::backup::retention::PruneReport;
use crate::backup::selector::BackupDecision;
use crate::common::errors::BackupError;
use crate::common::format::{format_count, format_duration, format_path, format_size};
use crate::transfer::sftp::UploadReport;

/// Print a full run report in human-readable format
pub fn print_run_report(report: &RunReport) {
    println!();
    println!("{}  volback run", "📦");
    println!("{}", "─".repeat(60).dimmed());

    if let Some(pre) = &report.pre {
        print_hook_section("Pre-backup commands", pre);
    }

    match &report.export {
        Some(export) => print_export_section(export),
        None => println!("  {} export stage did not run", "✗".red()),
    }

    if let Some(upload) = &report.upload {
        print_upload_section(upload);
    }

    if let Some(post) = &report.post {
        print_hook_section("Post-backup commands", post);
    }

    match &report.prune {
        Some(prune) => print_prune_section(prune),
        None => println!("  {} retention stage did not run", "✗".red()),
    }

    print_error_list(&report.stage_errors);

    println!("{}", "─".repeat(60).dimmed());
    let marker = if report.clean() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    println!(
        "  {} Finished in {}",
        marker,
        format_duration(report.duration_secs).cyan()
    );
    println!();
}

/// Print a full run report as JSON
pub fn print_run_json(report: &RunReport) {
    let json = serde_json::json!({
        "clean": report.clean(),
        "duration_secs": report.duration_secs,
        "pre": report.pre.as_ref().map(hook_json),
        "export": report.export.as_ref().map(|e| serde_json::json!({
            "exported": e.exported,
            "skipped": e.skipped,
            "artifacts": e.artifacts.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "errors": error_strings(&e.errors),
        })),
        "upload": report.upload.as_ref().map(|u| serde_json::json!({
            "uploaded": u.uploaded.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "bytes_sent": u.bytes_sent,
            "error": u.error.as_ref().map(|e| e.to_string()),
        })),
        "post": report.post.as_ref().map(hook_json),
        "prune": report.prune.as_ref().map(|p| serde_json::json!({
            "removed": p.removed.iter().map(|f| f.display().to_string()).collect::<Vec<_>>(),
            "bytes_freed": p.bytes_freed,
            "errors": error_strings(&p.errors),
        })),
        "stage_errors": error_strings(&report.stage_errors),
    });
    println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
}

/// Single-line summary: exported uploaded pruned clean
pub fn print_run_quiet(report: &RunReport) {
    println!(
        "{}  {}  {}  {}",
        report.export.as_ref().map_or(0, |e| e.exported.len()),
        report.upload.as_ref().map_or(0, |u| u.uploaded.len()),
        report.prune.as_ref().map_or(0, |p| p.removed.len()),
        if report.clean() { "clean" } else { "errors" }
    );
}

/// Print what a dry run would do
pub fn print_plan(plan: &PlanReport) {
    println!();
    println!("{}  volback run (dry run)", "📦");
    println!("{}", "─".repeat(60).dimmed());

    print_volume_list(&plan.volumes);

    if !plan.artifacts.is_empty() {
        println!("  Would export:");
        for artifact in &plan.artifacts {
            println!("    {} {}", "→".dimmed(), format_path(artifact));
        }
        println!();
    }

    if plan.prune_candidates.is_empty() {
        println!("  Nothing currently eligible for pruning.");
    } else {
        println!(
            "  Would prune {}:",
            format_count(plan.prune_candidates.len(), "archive")
        );
        for path in &plan.prune_candidates {
            println!("    {} {}", "→".dimmed(), format_path(path));
        }
    }
    println!();
    println!("  {} Dry run — no files modified.", "ℹ️");
    println!();
}

pub fn print_plan_json(plan: &PlanReport) {
    let json = serde_json::json!({
        "volumes": plan.volumes.iter().map(|(name, decision)| serde_json::json!({
            "name": name,
            "decision": decision_label(*decision),
        })).collect::<Vec<_>>(),
        "artifacts": plan.artifacts.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "prune_candidates": plan.prune_candidates.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
}

/// Print discovered volumes with their decisions
pub fn print_volume_list(volumes: &[(String, BackupDecision)]) {
    if volumes.is_empty() {
        println!("  No volumes found.");
        println!();
        return;
    }

    let included = volumes
        .iter()
        .filter(|(_, d)| *d == BackupDecision::Include)
        .count();
    println!(
        "  {} discovered, {} selected",
        format_count(volumes.len(), "volume"),
        included
    );
    println!();
    for (name, decision) in volumes {
        match decision {
            BackupDecision::Include => {
                println!("    {} {}", "●".green(), name);
            }
            BackupDecision::Skip => {
                println!("    {} {}", "○".dimmed(), name.to_string().dimmed());
            }
        }
    }
    println!();
}

pub fn print_volumes_json(volumes: &[(String, BackupDecision)]) {
    let json = volumes
        .iter()
        .map(|(name, decision)| {
            serde_json::json!({
                "name": name,
                "decision": decision_label(*decision),
            })
        })
        .collect::<Vec<_>>();
    println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
}

pub fn print_volumes_quiet(volumes: &[(String, BackupDecision)]) {
    for (name, decision) in volumes {
        println!("{}  {}", name, decision_label(*decision));
    }
}

/// Print the outcome of a standalone prune
pub fn print_prune_report(report: &PruneReport) {
    println!();
    print_prune_section(report);
    println!();
}

pub fn print_prune_json(report: &PruneReport) {
    let json = serde_json::json!({
        "removed": report.removed.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "bytes_freed": report.bytes_freed,
        "errors": error_strings(&report.errors),
    });
    println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
}

/// Print config validation warnings
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("  {} {}", "⚠".yellow(), warning.yellow());
    }
    if !warnings.is_empty() {
        println!();
    }
}

// ─── Sections ─────────────────────────────────────────────────────────────────

fn print_hook_section(title: &str, report: &HookReport) {
    let marker = if report.all_succeeded() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    println!(
        "  {} {}: {}/{} succeeded",
        marker, title, report.succeeded, report.attempted
    );
    print_error_list(&report.errors);
}

fn print_export_section(report: &ExportReport) {
    let marker = if report.errors.is_empty() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    println!(
        "  {} Export: {} exported, {} skipped by filters",
        marker,
        format_count(report.exported.len(), "volume"),
        report.skipped.len()
    );
    for volume in &report.exported {
        println!("    {} {}", "→".dimmed(), volume);
    }
    print_error_list(&report.errors);
}

fn print_upload_section(report: &UploadReport) {
    let marker = if report.succeeded() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    println!(
        "  {} Upload: {} ({})",
        marker,
        format_count(report.uploaded.len(), "archive"),
        format_size(report.bytes_sent)
    );
    if let Some(error) = &report.error {
        println!("    {} {}", "✗".red(), error.to_string().red());
    }
}

fn print_prune_section(report: &PruneReport) {
    let marker = if report.errors.is_empty() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    println!(
        "  {} Prune: {} removed ({} freed)",
        marker,
        format_count(report.removed.len(), "archive"),
        format_size(report.bytes_freed)
    );
    for path in &report.removed {
        println!("    {} {}", "→".dimmed(), format_path(path));
    }
    print_error_list(&report.errors);
}

fn print_error_list(errors: &[BackupError]) {
    for error in errors {
        println!("    {} {}", "✗".red(), error.to_string().red());
    }
}

fn hook_json(report: &HookReport) -> serde_json::Value {
    serde_json::json!({
        "attempted": report.attempted,
        "succeeded": report.succeeded,
        "errors": error_strings(&report.errors),
    })
}

fn error_strings(errors: &[BackupError]) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}

fn decision_label(decision: BackupDecision) -> &'static str {
    match decision {
        BackupDecision::Include => "include",
        BackupDecision::Skip => "skip",
    }
}
