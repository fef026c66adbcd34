//! JSON file record store
//!
//! Holds the whole snapshot in a single `records.json`, rewritten atomically
//! on every change.

use std::path::PathBuf;

use tracing::info;

use crate::backup::RestoreResult;
use crate::error::{WellplanError, WellplanResult};
use crate::models::{CheckInRecord, PlanRecord, ProfileRecord, StoredCheckIn, StoredPlan, StoredProfile};

use super::file_io::{read_json, write_json_atomic};
use super::{RecordSink, RecordSource, StoreSnapshot};

/// Record store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store at the given path; the file is created on first write
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the path to the records file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Whether a plan is installed
    pub fn has_plan(&self) -> WellplanResult<bool> {
        Ok(self.load_snapshot()?.plan.is_some())
    }

    /// Write a snapshot
    pub fn save(&self, snapshot: &StoreSnapshot) -> WellplanResult<()> {
        write_json_atomic(&self.path, snapshot)
    }

    /// Install a plan, replacing any existing one
    pub fn install_plan(&self, record: PlanRecord) -> WellplanResult<StoredPlan> {
        let mut snapshot = self.load_snapshot()?;
        let stored = StoredPlan::new(record);
        snapshot.plan = Some(stored.clone());
        self.save(&snapshot)?;
        Ok(stored)
    }

    /// Create or replace the profile
    pub fn save_profile(&self, record: ProfileRecord) -> WellplanResult<StoredProfile> {
        record
            .validate()
            .map_err(|e| WellplanError::Validation(e.to_string()))?;

        let mut snapshot = self.load_snapshot()?;
        let stored = match snapshot.profile.take() {
            Some(existing) => StoredProfile {
                id: existing.id,
                record,
            },
            None => StoredProfile::new(record),
        };
        snapshot.profile = Some(stored.clone());
        self.save(&snapshot)?;
        Ok(stored)
    }

    /// Append a check-in to the history
    pub fn record_check_in(&self, record: CheckInRecord) -> WellplanResult<StoredCheckIn> {
        let mut snapshot = self.load_snapshot()?;
        if snapshot.plan.is_none() {
            return Err(WellplanError::plan_not_found("installed plan"));
        }
        let stored = StoredCheckIn::new(record);
        snapshot.check_ins.push(stored.clone());
        self.save(&snapshot)?;
        Ok(stored)
    }
}

impl RecordSource for JsonFileStore {
    fn load_snapshot(&self) -> WellplanResult<StoreSnapshot> {
        read_json(&self.path)
    }
}

impl RecordSink for JsonFileStore {
    fn persist_restore(&self, result: &RestoreResult) -> WellplanResult<()> {
        if let Some(ref profile) = result.profile {
            profile
                .validate()
                .map_err(|e| WellplanError::Validation(e.to_string()))?;
        }

        let snapshot = StoreSnapshot::from_restore(result);
        self.save(&snapshot)?;
        info!(
            check_ins = snapshot.check_ins.len(),
            has_profile = snapshot.profile.is_some(),
            "Restored records persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Zone;
    use chrono::Utc;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("data").join("records.json"));
        (store, temp_dir)
    }

    fn plan() -> PlanRecord {
        PlanRecord::new("p1", "r1", 1, "CODE", json!({"skills": []}), "dev")
    }

    #[test]
    fn test_empty_store() {
        let (store, _temp) = create_test_store();
        let snapshot = store.load_snapshot().unwrap();
        assert_eq!(snapshot, StoreSnapshot::default());
        assert!(!store.has_plan().unwrap());
    }

    #[test]
    fn test_install_and_check_in() {
        let (store, _temp) = create_test_store();
        store.install_plan(plan()).unwrap();
        store
            .record_check_in(CheckInRecord::new("p1", Zone::Yellow))
            .unwrap();

        let snapshot = store.load_snapshot().unwrap();
        assert!(snapshot.plan.is_some());
        assert_eq!(snapshot.check_ins.len(), 1);
    }

    #[test]
    fn test_check_in_requires_plan() {
        let (store, _temp) = create_test_store();
        let err = store
            .record_check_in(CheckInRecord::new("p1", Zone::Green))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_save_profile_keeps_id() {
        let (store, _temp) = create_test_store();
        let first = store.save_profile(ProfileRecord::new("Alex")).unwrap();
        let second = store.save_profile(ProfileRecord::new("Sam")).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.record.display_name, "Sam");
    }

    #[test]
    fn test_persist_restore_assigns_new_ids() {
        let (store, _temp) = create_test_store();
        let old_plan = store.install_plan(plan()).unwrap();

        let now = Utc::now();
        let result = RestoreResult {
            version: 1,
            backup_created_at: now,
            restored_at: now,
            plan: plan(),
            profile: Some(ProfileRecord::new("Alex")),
            check_ins: vec![CheckInRecord::new("p1", Zone::Green)],
        };
        store.persist_restore(&result).unwrap();

        let snapshot = store.load_snapshot().unwrap();
        assert_ne!(snapshot.plan.unwrap().id, old_plan.id);
        assert_eq!(snapshot.profile.unwrap().record.display_name, "Alex");
        assert_eq!(snapshot.check_ins[0].record, result.check_ins[0]);
    }

    #[test]
    fn test_persist_restore_rejects_invalid_profile() {
        let (store, _temp) = create_test_store();
        let original = store.install_plan(plan()).unwrap();

        let now = Utc::now();
        let result = RestoreResult {
            version: 1,
            backup_created_at: now,
            restored_at: now,
            plan: plan(),
            profile: Some(ProfileRecord::new("")),
            check_ins: Vec::new(),
        };
        assert!(matches!(
            store.persist_restore(&result).unwrap_err(),
            WellplanError::Validation(_)
        ));

        // Store untouched
        assert_eq!(store.load_snapshot().unwrap().plan.unwrap().id, original.id);
    }
}
