//! Backup payload
//!
//! The plaintext document that gets encrypted into a backup envelope. It only
//! ever exists transiently: built fresh for each export and discarded after
//! encryption, or produced by decryption and immediately turned into a
//! [`RestoreResult`](super::RestoreResult).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{RestoreError, WellplanError, WellplanResult};
use crate::models::{CheckInRecord, PlanRecord, ProfileRecord, StoredCheckIn, StoredPlan, StoredProfile};

/// Current payload schema version
pub const PAYLOAD_VERSION: u32 = 1;

/// Plaintext backup contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    /// Payload schema version
    pub version: u32,

    /// When the backup was made
    pub created_at: DateTime<Utc>,

    pub plan: PlanRecord,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_ins: Option<Vec<CheckInRecord>>,
}

/// Build a payload from stored records
///
/// Local identifiers are dropped from every record; they mean nothing outside
/// the store that assigned them.
pub fn build_payload(
    plan: &StoredPlan,
    profile: Option<&StoredProfile>,
    check_ins: Option<&[StoredCheckIn]>,
) -> BackupPayload {
    BackupPayload {
        version: PAYLOAD_VERSION,
        created_at: Utc::now(),
        plan: plan.to_record(),
        profile: profile.map(StoredProfile::to_record),
        check_ins: check_ins.map(|c| c.iter().map(StoredCheckIn::to_record).collect()),
    }
}

impl BackupPayload {
    /// Number of check-ins carried, treating an absent list as empty
    pub fn check_in_count(&self) -> usize {
        self.check_ins.as_ref().map_or(0, Vec::len)
    }

    /// Serialize for encryption
    pub fn to_bytes(&self) -> WellplanResult<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| WellplanError::Export(format!("Failed to serialize backup payload: {}", e)))
    }

    /// Parse decrypted plaintext
    ///
    /// The version is checked before anything else about the structure, so a
    /// payload from a newer format is rejected outright instead of being
    /// half-understood. Older versions are read as subsets of the current one.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RestoreError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|_| RestoreError::InvalidFormat)?;
        let object = value.as_object().ok_or(RestoreError::InvalidFormat)?;

        let version = object
            .get("version")
            .ok_or_else(|| RestoreError::missing_field("version"))?
            .as_u64()
            .ok_or_else(|| RestoreError::InvalidStructure("version must be a non-negative integer".into()))?;

        if version > u64::from(PAYLOAD_VERSION) {
            return Err(RestoreError::UnsupportedVersion {
                found: u32::try_from(version).unwrap_or(u32::MAX),
                supported: PAYLOAD_VERSION,
            });
        }

        if object.get("plan").map_or(true, |p| p.is_null()) {
            return Err(RestoreError::missing_field("plan"));
        }

        serde_json::from_value(value).map_err(|e| RestoreError::InvalidStructure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Zone;
    use serde_json::json;

    fn stored_plan() -> StoredPlan {
        StoredPlan::new(PlanRecord::new(
            "p1",
            "rev-1",
            3,
            "ABC123",
            json!({"skills": [{"id": "s1", "title": "Breathing"}], "crisisResources": []}),
            "install-1",
        ))
    }

    #[test]
    fn test_build_payload_strips_local_ids() {
        let plan = stored_plan();
        let profile = StoredProfile::new(ProfileRecord::new("Alex"));
        let check_ins = vec![
            StoredCheckIn::new(CheckInRecord::new("p1", Zone::Green)),
            StoredCheckIn::new(CheckInRecord::new("p1", Zone::Red)),
        ];

        let payload = build_payload(&plan, Some(&profile), Some(&check_ins));
        let value = serde_json::to_value(&payload).unwrap();

        assert!(value["plan"].get("id").is_none());
        assert!(value["profile"].get("id").is_none());
        for check_in in value["checkIns"].as_array().unwrap() {
            assert!(check_in.get("id").is_none());
        }
        let text = value.to_string();
        assert!(!text.contains(&plan.id.as_uuid().to_string()));
        assert!(!text.contains(&profile.id.as_uuid().to_string()));
    }

    #[test]
    fn test_build_payload_stamps_version_and_time() {
        let before = Utc::now();
        let payload = build_payload(&stored_plan(), None, None);

        assert_eq!(payload.version, PAYLOAD_VERSION);
        assert!(payload.created_at >= before);
        assert!(payload.profile.is_none());
        assert!(payload.check_ins.is_none());
        assert_eq!(payload.check_in_count(), 0);
    }

    #[test]
    fn test_optional_sections_omitted_from_json() {
        let payload = build_payload(&stored_plan(), None, None);
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("profile").is_none());
        assert!(value.get("checkIns").is_none());
    }

    #[test]
    fn test_bytes_round_trip_keeps_opaque_plan() {
        let payload = build_payload(&stored_plan(), None, Some(&[]));
        let bytes = payload.to_bytes().unwrap();
        let parsed = BackupPayload::from_bytes(&bytes).unwrap();

        assert_eq!(parsed, payload);
        assert_eq!(parsed.plan.plan_payload["skills"][0]["title"], "Breathing");
    }

    #[test]
    fn test_from_bytes_missing_plan() {
        let bytes = br#"{"version": 1, "createdAt": "2024-01-01T00:00:00Z"}"#;
        assert_eq!(
            BackupPayload::from_bytes(bytes).unwrap_err(),
            RestoreError::missing_field("plan")
        );
    }

    #[test]
    fn test_from_bytes_missing_version() {
        let bytes = br#"{"createdAt": "2024-01-01T00:00:00Z", "plan": {}}"#;
        assert_eq!(
            BackupPayload::from_bytes(bytes).unwrap_err(),
            RestoreError::missing_field("version")
        );
    }

    #[test]
    fn test_from_bytes_newer_version() {
        let bytes = br#"{"version": 2, "createdAt": "2024-01-01T00:00:00Z", "plan": {"whatever": true}}"#;
        assert_eq!(
            BackupPayload::from_bytes(bytes).unwrap_err(),
            RestoreError::UnsupportedVersion {
                found: 2,
                supported: PAYLOAD_VERSION
            }
        );
    }

    #[test]
    fn test_from_bytes_not_json() {
        assert_eq!(
            BackupPayload::from_bytes(b"\x00\x01binary").unwrap_err(),
            RestoreError::InvalidFormat
        );
    }

    #[test]
    fn test_from_bytes_malformed_plan() {
        let bytes = br#"{"version": 1, "createdAt": "2024-01-01T00:00:00Z", "plan": {"actionPlanId": 5}}"#;
        assert!(matches!(
            BackupPayload::from_bytes(bytes),
            Err(RestoreError::InvalidStructure(_))
        ));
    }
}
