/// Whether a discovered volume is in scope for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupDecision {
    Include,
    Skip,
}

/// Decide whether to back up one volume, given the configured pattern lists.
///
/// Matching is case-sensitive substring containment, not glob or regex.
/// Include patterns take precedence: when any are set, the exclude list is
/// not consulted at all. With both lists empty, everything is included.
pub fn decide(volume: &str, include: &[String], exclude: &[String]) -> BackupDecision {
    if !include.is_empty() {
        if include.iter().any(|p| volume.contains(p.as_str())) {
            BackupDecision::Include
        } else {
            BackupDecision::Skip
        }
    } else if !exclude.is_empty() {
        if exclude.iter().any(|p| volume.contains(p.as_str())) {
            BackupDecision::Skip
        } else {
            BackupDecision::Include
        }
    } else {
        BackupDecision::Include
    }
}
