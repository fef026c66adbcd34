//! Patient profile
//!
//! Display name, onboarding state and reminder preferences.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ProfileId;

/// How often check-in reminders fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for NotificationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// A profile as it travels in a backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Name shown in the app
    pub display_name: String,

    /// Whether onboarding has been completed
    #[serde(default)]
    pub onboarding_complete: bool,

    /// Whether reminders are enabled
    #[serde(default)]
    pub notifications_enabled: bool,

    /// Reminder cadence
    #[serde(default)]
    pub notification_frequency: NotificationFrequency,

    /// Reminder time of day, "HH:MM" (24-hour)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_time: Option<String>,

    /// When the profile was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last modified
    pub updated_at: DateTime<Utc>,
}

/// Validation errors for profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    EmptyDisplayName,
    DisplayNameTooLong(usize),
    InvalidNotificationTime(String),
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDisplayName => write!(f, "Display name cannot be empty"),
            Self::DisplayNameTooLong(len) => {
                write!(f, "Display name too long ({} chars, max 100)", len)
            }
            Self::InvalidNotificationTime(t) => {
                write!(f, "Notification time '{}' is not HH:MM", t)
            }
        }
    }
}

impl std::error::Error for ProfileValidationError {}

impl ProfileRecord {
    /// Create a new profile
    pub fn new(display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            display_name: display_name.into(),
            onboarding_complete: false,
            notifications_enabled: false,
            notification_frequency: NotificationFrequency::default(),
            notification_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark this profile as created at `now`
    pub fn recreate(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.updated_at = now;
    }

    /// Validate the profile
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        let name = self.display_name.trim();
        if name.is_empty() {
            return Err(ProfileValidationError::EmptyDisplayName);
        }

        if name.chars().count() > 100 {
            return Err(ProfileValidationError::DisplayNameTooLong(
                name.chars().count(),
            ));
        }

        if let Some(ref time) = self.notification_time {
            if time.len() != 5 || NaiveTime::parse_from_str(time, "%H:%M").is_err() {
                return Err(ProfileValidationError::InvalidNotificationTime(time.clone()));
            }
        }

        Ok(())
    }
}

/// A profile as held by the local store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    /// Local identifier, never exported
    pub id: ProfileId,

    #[serde(flatten)]
    pub record: ProfileRecord,
}

impl StoredProfile {
    /// Wrap a record with a fresh local identifier
    pub fn new(record: ProfileRecord) -> Self {
        Self {
            id: ProfileId::new(),
            record,
        }
    }

    /// The record without its local identifier
    pub fn to_record(&self) -> ProfileRecord {
        self.record.clone()
    }
}
