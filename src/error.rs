//! Custom error types for wellplan
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.
//!
//! Restore failures get their own enum, [`RestoreError`], because the restore
//! flow branches on the failure kind. Everything else funnels into
//! [`WellplanError`].

use thiserror::Error;

/// Why a backup file could not be turned back into records
///
/// `DecryptionFailed` deliberately covers both a wrong passphrase and a
/// corrupted or tampered file. The two are indistinguishable to AES-GCM and
/// must stay indistinguishable to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    /// The text is not a backup envelope at all
    #[error("Not a wellbeing plan backup file")]
    InvalidFormat,

    /// Parsed, but a required field is missing or malformed
    #[error("Backup file is incomplete: {0}")]
    InvalidStructure(String),

    /// Written by a newer version of the format
    #[error("Backup format version {found} is newer than the supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Authentication tag did not verify
    #[error("Could not decrypt backup: the passphrase is wrong or the file is damaged")]
    DecryptionFailed,
}

impl RestoreError {
    /// Create an "invalid structure" error naming the offending field
    pub fn missing_field(field: &str) -> Self {
        Self::InvalidStructure(format!("missing field '{}'", field))
    }

    /// Check if this is the ambiguous passphrase/corruption failure
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::DecryptionFailed)
    }
}

/// The main error type for wellplan operations
#[derive(Error, Debug)]
pub enum WellplanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Encryption errors (export side)
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Restore errors
    #[error(transparent)]
    Restore(#[from] RestoreError),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WellplanError {
    /// Create a "not found" error for the installed plan
    pub fn plan_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Plan",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

}

// Implement From traits for common error types

impl From<std::io::Error> for WellplanError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WellplanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for wellplan operations
pub type WellplanResult<T> = Result<T, WellplanError>;
