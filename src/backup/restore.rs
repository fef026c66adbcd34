//! Backup restoration for wellplan
//!
//! Turns backup file text back into records ready to persist. Opening a
//! backup has no side effects; writing the result to a store is a separate
//! step owned by the caller.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::crypto::{decrypt, EncryptedEnvelope, Passphrase};
use crate::error::RestoreError;
use crate::models::{CheckInRecord, PlanRecord, ProfileRecord};

use super::payload::BackupPayload;

/// Records reconstructed from a backup
///
/// Restoring counts as a fresh install, so the plan and profile timestamps are
/// set to the restore time. Check-in timestamps are copied unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreResult {
    /// Payload version the backup was written with
    pub version: u32,
    /// When the backup was made
    pub backup_created_at: DateTime<Utc>,
    /// When the restore happened
    pub restored_at: DateTime<Utc>,
    pub plan: PlanRecord,
    pub profile: Option<ProfileRecord>,
    pub check_ins: Vec<CheckInRecord>,
}

impl RestoreResult {
    /// Whether onboarding has to be redone after restoring
    pub fn needs_onboarding(&self) -> bool {
        self.profile
            .as_ref()
            .map_or(true, |p| !p.onboarding_complete)
    }

    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("plan {}", self.plan.action_plan_id)];
        if let Some(ref profile) = self.profile {
            parts.push(format!("profile for {}", profile.display_name));
        }
        if !self.check_ins.is_empty() {
            parts.push(format!("{} check-ins", self.check_ins.len()));
        }
        format!("Restored: {}", parts.join(", "))
    }
}

/// Rebuild records from a decrypted payload
///
/// An absent and an empty check-in list both restore as no history.
pub fn restore_payload(payload: BackupPayload, now: DateTime<Utc>) -> RestoreResult {
    let BackupPayload {
        version,
        created_at,
        mut plan,
        profile,
        check_ins,
    } = payload;

    plan.reinstall(now);
    let profile = profile.map(|mut p| {
        p.recreate(now);
        p
    });

    RestoreResult {
        version,
        backup_created_at: created_at,
        restored_at: now,
        plan,
        profile,
        check_ins: check_ins.unwrap_or_default(),
    }
}

/// Decrypt and validate backup file text
///
/// Every call is a full, fresh attempt: parse, version gate, decrypt, parse
/// payload, rebuild records.
pub fn open_backup(text: &str, passphrase: &Passphrase) -> Result<RestoreResult, RestoreError> {
    let envelope = EncryptedEnvelope::from_json(text)?;
    debug!(version = envelope.version, "Parsed backup envelope");

    let plaintext = decrypt(&envelope, passphrase)?;
    let payload = BackupPayload::from_bytes(&plaintext)?;
    debug!(
        version = payload.version,
        check_ins = payload.check_in_count(),
        "Decrypted backup payload"
    );

    Ok(restore_payload(payload, Utc::now()))
}
