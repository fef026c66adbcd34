//! Local record store
//!
//! The backup core never reaches into storage on its own. Callers pass a
//! [`RecordSource`] when exporting and a [`RecordSink`] when persisting a
//! restore. [`JsonFileStore`] is the file-backed implementation the CLI uses.

pub mod file_io;
pub mod json_store;

pub use file_io::{read_json, write_json_atomic, write_text_atomic};
pub use json_store::JsonFileStore;

use serde::{Deserialize, Serialize};

use crate::backup::RestoreResult;
use crate::error::WellplanResult;
use crate::models::{StoredCheckIn, StoredPlan, StoredProfile};

/// Everything the store currently holds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub plan: Option<StoredPlan>,

    #[serde(default)]
    pub profile: Option<StoredProfile>,

    #[serde(default)]
    pub check_ins: Vec<StoredCheckIn>,
}

impl StoreSnapshot {
    /// Build a snapshot from restored records, assigning fresh local ids
    pub fn from_restore(result: &RestoreResult) -> Self {
        Self {
            plan: Some(StoredPlan::new(result.plan.clone())),
            profile: result.profile.clone().map(StoredProfile::new),
            check_ins: result
                .check_ins
                .iter()
                .cloned()
                .map(StoredCheckIn::new)
                .collect(),
        }
    }
}

/// Supplies current records for export
pub trait RecordSource {
    /// Load the current plan, profile and check-in history
    fn load_snapshot(&self) -> WellplanResult<StoreSnapshot>;
}

/// Accepts restored records for persistence
pub trait RecordSink {
    /// Replace local records with the restored ones
    fn persist_restore(&self, result: &RestoreResult) -> WellplanResult<()>;
}
