use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Build the archive filename for one volume on one date:
/// `<prefix>_<volume>_<YYYYMMDD>.tar`.
///
/// Deterministic, so a rerun on the same date produces the same name and
/// overwrites the earlier archive. Distinct volume names never collide for a
/// fixed prefix and date.
pub fn artifact_file_name(prefix: &str, volume: &str, date: NaiveDate) -> String {
    format!("{}_{}_{}.tar", prefix, volume, date.format("%Y%m%d"))
}

/// Full path of the archive inside the backup directory
pub fn artifact_path(backup_dir: &Path, prefix: &str, volume: &str, date: NaiveDate) -> PathBuf {
    backup_dir.join(artifact_file_name(prefix, volume, date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            artifact_file_name("bkp", "app", date(2024, 1, 1)),
            "bkp_app_20240101.tar"
        );
        assert_eq!(
            artifact_file_name("bkp", "db", date(2024, 1, 1)),
            "bkp_db_20240101.tar"
        );
    }

    #[test]
    fn test_deterministic_no_collision_suffix() {
        // Same inputs, same name: a same-day rerun overwrites, by contract
        let a = artifact_file_name("bkp", "app", date(2024, 1, 1));
        let b = artifact_file_name("bkp", "app", date(2024, 1, 1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_volumes_never_collide() {
        let names: Vec<String> = ["app", "db", "cache", "app2"]
            .iter()
            .map(|v| artifact_file_name("bkp", v, date(2024, 3, 25)))
            .collect();
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_date_is_zero_padded() {
        assert_eq!(
            artifact_file_name("bkp", "app", date(2024, 3, 5)),
            "bkp_app_20240305.tar"
        );
    }

    #[test]
    fn test_artifact_path_joins_backup_dir() {
        let path = artifact_path(Path::new("/var/backups"), "bkp", "db", date(2024, 1, 1));
        assert_eq!(path, PathBuf::from("/var/backups/bkp_db_20240101.tar"));
    }
}
