//! User settings for wellplan
//!
//! Manages export preferences: default file extension, pretty printing,
//! where backups go and what nickname names them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::WellplanPaths;
use crate::backup::BackupFormat;
use crate::error::WellplanError;

/// User settings for wellplan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Extension used for new backups
    #[serde(default)]
    pub default_format: BackupFormat,

    /// Pretty-print backup files
    #[serde(default)]
    pub pretty_print: bool,

    /// Where backups are written (defaults to the exports directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Nickname used in backup filenames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_nickname: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_format: BackupFormat::default(),
            pretty_print: false,
            export_dir: None,
            plan_nickname: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &WellplanPaths) -> Result<Self, WellplanError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                WellplanError::Io(format!("Failed to read settings file: {}", e))
            })?;

            serde_json::from_str(&contents).map_err(|e| {
                WellplanError::Config(format!("Failed to parse settings file: {}", e))
            })
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &WellplanPaths) -> Result<(), WellplanError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            WellplanError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            WellplanError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Directory new backups are written to
    pub fn resolve_export_dir(&self, paths: &WellplanPaths) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| paths.export_dir())
    }
}
