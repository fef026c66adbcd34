//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup core.

pub mod backup;
pub mod status;

pub use backup::{handle_export, handle_inspect, handle_restore, ExportArgs, RestoreArgs, PASSPHRASE_ENV};
pub use status::{handle_config, handle_status};
