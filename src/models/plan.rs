//! Installed wellbeing plan
//!
//! A plan is authored by a provider and installed on the patient's device
//! with an access code. The plan content itself (skills, supportive adults,
//! help methods, crisis resources) is carried as an opaque JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::PlanId;

/// A plan snapshot as it travels in a backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecord {
    /// Provider-side action plan identifier
    pub action_plan_id: String,

    /// Provider-side revision identifier
    pub revision_id: String,

    /// Revision number of the installed content
    pub revision_version: u32,

    /// Access code used to install the plan
    pub access_code: String,

    /// Plan content, never interpreted here
    pub plan_payload: serde_json::Value,

    /// Identifier of the installation on the originating device
    pub device_install_id: String,

    /// When the plan was installed
    pub installed_at: DateTime<Utc>,

    /// When the plan was last opened
    pub last_accessed_at: DateTime<Utc>,
}

impl PlanRecord {
    /// Create a plan record installed now
    pub fn new(
        action_plan_id: impl Into<String>,
        revision_id: impl Into<String>,
        revision_version: u32,
        access_code: impl Into<String>,
        plan_payload: serde_json::Value,
        device_install_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            action_plan_id: action_plan_id.into(),
            revision_id: revision_id.into(),
            revision_version,
            access_code: access_code.into(),
            plan_payload,
            device_install_id: device_install_id.into(),
            installed_at: now,
            last_accessed_at: now,
        }
    }

    /// Mark this plan as freshly installed at `now`
    pub fn reinstall(&mut self, now: DateTime<Utc>) {
        self.installed_at = now;
        self.last_accessed_at = now;
    }
}

/// A plan as held by the local store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlan {
    /// Local identifier, never exported
    pub id: PlanId,

    #[serde(flatten)]
    pub record: PlanRecord,
}

impl StoredPlan {
    /// Wrap a record with a fresh local identifier
    pub fn new(record: PlanRecord) -> Self {
        Self {
            id: PlanId::new(),
            record,
        }
    }

    /// The record without its local identifier
    pub fn to_record(&self) -> PlanRecord {
        self.record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_plan_timestamps_match() {
        let plan = PlanRecord::new("p1", "r1", 2, "CODE", json!({}), "dev-1");
        assert_eq!(plan.installed_at, plan.last_accessed_at);
    }

    #[test]
    fn test_camel_case_fields() {
        let plan = PlanRecord::new("p1", "r1", 2, "CODE", json!({"skills": []}), "dev-1");
        let value = serde_json::to_value(&plan).unwrap();

        assert_eq!(value["actionPlanId"], "p1");
        assert_eq!(value["revisionVersion"], 2);
        assert_eq!(value["planPayload"], json!({"skills": []}));
        assert!(value.get("installedAt").is_some());
        assert!(value.get("lastAccessedAt").is_some());
    }

    #[test]
    fn test_stored_plan_flattens_record() {
        let stored = StoredPlan::new(PlanRecord::new("p1", "r1", 1, "C", json!(null), "d"));
        let value = serde_json::to_value(&stored).unwrap();

        assert!(value.get("id").is_some());
        assert_eq!(value["actionPlanId"], "p1");

        let back: StoredPlan = serde_json::from_value(value).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn test_to_record_drops_id() {
        let stored = StoredPlan::new(PlanRecord::new("p1", "r1", 1, "C", json!({}), "d"));
        let value = serde_json::to_value(stored.to_record()).unwrap();
        assert!(value.get("id").is_none());
    }
}
