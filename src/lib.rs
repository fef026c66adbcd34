//! wellplan - encrypted backup and restore for wellbeing plans
//!
//! A patient's installed plan, profile and check-in history can be exported
//! into a single passphrase-protected file and restored on any device.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: PBKDF2 key derivation and AES-256-GCM envelopes
//! - `backup`: payload building, export, restore and the restore state machine
//! - `models`: plan, profile and check-in records
//! - `store`: record source/sink traits and a JSON file store
//! - `config`: configuration and path management
//! - `error`: custom error types
//! - `cli`: command handlers for the `wellplan` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use wellplan::backup::open_backup;
//! use wellplan::crypto::Passphrase;
//!
//! let text = std::fs::read_to_string("alex-backup-2024-05-01.wbap")?;
//! let result = open_backup(&text, &Passphrase::new("correct-horse"))?;
//! println!("{}", result.summary());
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod store;

pub use error::{RestoreError, WellplanError, WellplanResult};
