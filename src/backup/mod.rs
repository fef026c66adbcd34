//! Encrypted backup and restore for wellplan
//!
//! # Architecture
//!
//! - `payload`: the versioned plaintext document (plan, profile, check-ins)
//! - `export`: builds a payload from a record source and seals it to a file
//! - `restore`: opens a backup file and rebuilds records
//! - `orchestrator`: the retry/escalation state machine around restore
//! - `filename`: naming and extension rules for backup files
//!
//! # Backup Format
//!
//! A backup file is a JSON envelope:
//! - `version`: envelope format version
//! - `salt`: 16 random bytes, base64
//! - `iv`: 12 random bytes (AES-GCM nonce), base64
//! - `data`: AES-256-GCM ciphertext with tag, base64
//!
//! # Example
//!
//! ```rust,ignore
//! use wellplan::backup::{BackupExporter, ExportOptions, RestoreFlow};
//! use wellplan::crypto::Passphrase;
//!
//! let exporter = BackupExporter::new(&store, ExportOptions::default());
//! let summary = exporter.export_to_dir(&dir, &Passphrase::new("correct-horse"))?;
//!
//! let mut flow = RestoreFlow::new();
//! flow.select_file("plan.wbap", std::fs::read_to_string(&summary.path)?);
//! flow.set_passphrase(Passphrase::new("correct-horse"));
//! flow.submit_and_wait();
//! ```

pub mod export;
pub mod filename;
pub mod orchestrator;
pub mod payload;
pub mod restore;

pub use export::{BackupExporter, ExportOptions, ExportSummary};
pub use filename::{
    backup_filename, ensure_backup_path, sanitize_nickname, BackupFormat, BACKUP_CONTENT_TYPE,
};
pub use orchestrator::{transition, AttemptReport, RestoreAttempt, RestoreEvent, RestoreFlow, RestoreState};
pub use payload::{build_payload, BackupPayload, PAYLOAD_VERSION};
pub use restore::{open_backup, restore_payload, RestoreResult};
