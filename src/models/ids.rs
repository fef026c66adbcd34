//! Local record ids
//!
//! Assigned by the record store when a record is saved on this device. They
//! are stripped from every backup and reassigned on restore.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! local_id {
    ($(#[$meta:meta])* $name:ident, $short_prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        /// Short form for terminal output, e.g. `plan-1a2b3c4d`
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{:08x}", $short_prefix, self.0.as_fields().0)
            }
        }
    };
}

local_id!(
    /// Id of the installed plan record
    PlanId,
    "plan-"
);
local_id!(
    /// Id of the profile record
    ProfileId,
    "prof-"
);
local_id!(
    /// Id of a single check-in
    CheckInId,
    "chk-"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_differ() {
        let a = PlanId::new();
        assert!(!a.as_uuid().is_nil());
        assert_ne!(a, PlanId::new());
    }

    #[test]
    fn test_short_display_matches_uuid_head() {
        let id = ProfileId::new();
        let shown = id.to_string();
        assert_eq!(shown.len(), "prof-".len() + 8);
        assert_eq!(&shown[5..], &id.as_uuid().to_string()[..8]);
        assert!(CheckInId::new().to_string().starts_with("chk-"));
    }

    #[test]
    fn test_stored_as_plain_uuid_string() {
        let id = PlanId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        assert_eq!(serde_json::from_str::<PlanId>(&json).unwrap(), id);
    }
}
