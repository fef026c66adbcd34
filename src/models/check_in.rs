//! Check-in history
//!
//! A check-in records the patient's zone at a point in time and which parts
//! of the plan they used. Check-ins form an append-only ledger: their
//! timestamps are historical facts and are never rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CheckInId;

/// Self-reported wellbeing zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Yellow => write!(f, "yellow"),
            Self::Red => write!(f, "red"),
        }
    }
}

/// A check-in as it travels in a backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    /// Plan the check-in was made against
    pub action_plan_id: String,

    pub zone: Zone,

    /// Skill ids used
    #[serde(default)]
    pub strategies_used: Vec<String>,

    /// Supportive adult ids contacted
    #[serde(default)]
    pub supportive_adults_contacted: Vec<String>,

    /// Help method ids selected
    #[serde(default)]
    pub help_methods_selected: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the check-in happened
    pub created_at: DateTime<Utc>,
}

impl CheckInRecord {
    /// Create a check-in made now
    pub fn new(action_plan_id: impl Into<String>, zone: Zone) -> Self {
        Self {
            action_plan_id: action_plan_id.into(),
            zone,
            strategies_used: Vec::new(),
            supportive_adults_contacted: Vec::new(),
            help_methods_selected: Vec::new(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Set the check-in time
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A check-in as held by the local store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCheckIn {
    /// Local identifier, never exported
    pub id: CheckInId,

    #[serde(flatten)]
    pub record: CheckInRecord,
}

impl StoredCheckIn {
    /// Wrap a record with a fresh local identifier
    pub fn new(record: CheckInRecord) -> Self {
        Self {
            id: CheckInId::new(),
            record,
        }
    }

    /// The record without its local identifier
    pub fn to_record(&self) -> CheckInRecord {
        self.record.clone()
    }
}
