//! Encrypted backup export
//!
//! Reads the current records from a [`RecordSource`], seals them under a
//! passphrase and writes the envelope to a conventionally named file.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::crypto::{encrypt, EncryptedEnvelope, Passphrase};
use crate::error::{WellplanError, WellplanResult};
use crate::store::{write_text_atomic, RecordSource};

use super::filename::{backup_filename, BackupFormat};
use super::payload::build_payload;

/// Result of an export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Where the backup was written
    pub path: PathBuf,
    /// Number of check-ins included
    pub check_in_count: usize,
    /// Whether a profile was included
    pub has_profile: bool,
}

/// Export options
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Nickname used in the filename
    pub nickname: Option<String>,
    /// File extension
    pub format: BackupFormat,
    /// Pretty-print the envelope JSON
    pub pretty: bool,
}

/// Creates encrypted backups from a record source
pub struct BackupExporter<'a, S: RecordSource> {
    source: &'a S,
    options: ExportOptions,
}

impl<'a, S: RecordSource> BackupExporter<'a, S> {
    /// Create a new exporter
    pub fn new(source: &'a S, options: ExportOptions) -> Self {
        Self { source, options }
    }

    /// Seal the current records into an envelope
    ///
    /// Fails with `NotFound` when no plan is installed; there is nothing
    /// meaningful to back up without one.
    pub fn seal(&self, passphrase: &Passphrase) -> WellplanResult<(EncryptedEnvelope, ExportSummary)> {
        let snapshot = self.source.load_snapshot()?;
        let plan = snapshot
            .plan
            .as_ref()
            .ok_or_else(|| WellplanError::plan_not_found("installed plan"))?;

        let check_ins = (!snapshot.check_ins.is_empty()).then_some(snapshot.check_ins.as_slice());
        let payload = build_payload(plan, snapshot.profile.as_ref(), check_ins);
        let bytes = payload.to_bytes()?;
        let envelope = encrypt(&bytes, passphrase)?;

        let summary = ExportSummary {
            path: PathBuf::new(),
            check_in_count: payload.check_in_count(),
            has_profile: payload.profile.is_some(),
        };
        Ok((envelope, summary))
    }

    /// Seal the current records and write them into `dir`
    pub fn export_to_dir(&self, dir: &Path, passphrase: &Passphrase) -> WellplanResult<ExportSummary> {
        let (envelope, mut summary) = self.seal(passphrase)?;

        let filename = backup_filename(
            self.options.nickname.as_deref(),
            Utc::now().date_naive(),
            self.options.format,
        );
        let path = dir.join(filename);

        let text = envelope.to_json(self.options.pretty)?;
        write_text_atomic(&path, &text)
            .map_err(|e| WellplanError::Export(format!("Failed to write {}: {}", path.display(), e)))?;

        info!(
            check_ins = summary.check_in_count,
            has_profile = summary.has_profile,
            "Backup exported"
        );
        summary.path = path;
        Ok(summary)
    }
}
