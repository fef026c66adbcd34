//! Backup file naming and extension handling
//!
//! Backups are named `<nickname>-backup-<YYYY-MM-DD>.<ext>`. The download is
//! served with a generic content type so nothing about the contents leaks
//! from the metadata.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{WellplanError, WellplanResult};

/// Content type for backup downloads
pub const BACKUP_CONTENT_TYPE: &str = "application/octet-stream";

/// Nickname used when the plan has none
pub const DEFAULT_NICKNAME: &str = "wellbeing-plan";

/// Backup file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackupFormat {
    /// `.wbap`, the primary extension
    #[default]
    Wbap,
    /// `.json`, accepted as an alias
    Json,
}

impl BackupFormat {
    /// The extension without a leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wbap => "wbap",
            Self::Json => "json",
        }
    }

    /// Determine the format from a file path, if the extension is accepted
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wbap" => Some(Self::Wbap),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for BackupFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Lowercase a nickname and replace every non-alphanumeric character with `-`
///
/// Replacement is one for one; runs of punctuation are not collapsed.
pub fn sanitize_nickname(nickname: &str) -> String {
    nickname
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Build the conventional backup filename
pub fn backup_filename(nickname: Option<&str>, date: NaiveDate, format: BackupFormat) -> String {
    let stem = match nickname.filter(|n| !n.trim().is_empty()) {
        Some(name) => sanitize_nickname(name),
        None => DEFAULT_NICKNAME.to_string(),
    };
    format!(
        "{}-backup-{}.{}",
        stem,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Check that a path looks like a backup file before reading it
pub fn ensure_backup_path(path: &Path) -> WellplanResult<BackupFormat> {
    BackupFormat::from_path(path).ok_or_else(|| {
        WellplanError::Validation(format!(
            "{} is not a backup file (expected .wbap or .json)",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    #[test]
    fn test_sanitize_nickname() {
        assert_eq!(sanitize_nickname("My Plan"), "my-plan");
        assert_eq!(sanitize_nickname("Sam's  Plan!"), "sam-s--plan-");
        assert_eq!(sanitize_nickname("Zoë"), "zo-");
        assert_eq!(sanitize_nickname("abc123"), "abc123");
    }

    #[test]
    fn test_backup_filename_with_nickname() {
        assert_eq!(
            backup_filename(Some("Alex Plan"), date(), BackupFormat::Wbap),
            "alex-plan-backup-2024-02-29.wbap"
        );
    }

    #[test]
    fn test_backup_filename_keeps_surrounding_spaces() {
        assert_eq!(
            backup_filename(Some(" My Plan "), date(), BackupFormat::Wbap),
            "-my-plan--backup-2024-02-29.wbap"
        );
    }

    #[test]
    fn test_backup_filename_default() {
        assert_eq!(
            backup_filename(None, date(), BackupFormat::Json),
            "wellbeing-plan-backup-2024-02-29.json"
        );
        assert_eq!(
            backup_filename(Some("   "), date(), BackupFormat::Wbap),
            "wellbeing-plan-backup-2024-02-29.wbap"
        );
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            BackupFormat::from_path(&PathBuf::from("a/b.wbap")),
            Some(BackupFormat::Wbap)
        );
        assert_eq!(
            BackupFormat::from_path(&PathBuf::from("b.JSON")),
            Some(BackupFormat::Json)
        );
        assert_eq!(BackupFormat::from_path(&PathBuf::from("b.txt")), None);
        assert_eq!(BackupFormat::from_path(&PathBuf::from("noext")), None);
    }

    #[test]
    fn test_ensure_backup_path() {
        assert!(ensure_backup_path(&PathBuf::from("x.wbap")).is_ok());
        let err = ensure_backup_path(&PathBuf::from("x.pdf")).unwrap_err();
        assert!(matches!(err, WellplanError::Validation(_)));
    }

    #[test]
    fn test_content_type_is_generic() {
        assert_eq!(BACKUP_CONTENT_TYPE, "application/octet-stream");
        assert_eq!(BackupFormat::default().to_string(), ".wbap");
    }
}
