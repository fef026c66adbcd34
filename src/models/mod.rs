//! Core data models for wellplan
//!
//! Each record type comes in two forms: the portable `*Record` that travels
//! inside a backup, and the `Stored*` wrapper that pairs it with a local
//! identifier assigned by the record store.

pub mod check_in;
pub mod ids;
pub mod plan;
pub mod profile;

pub use check_in::{CheckInRecord, StoredCheckIn, Zone};
pub use ids::{CheckInId, PlanId, ProfileId};
pub use plan::{PlanRecord, StoredPlan};
pub use profile::{NotificationFrequency, ProfileRecord, ProfileValidationError, StoredProfile};
