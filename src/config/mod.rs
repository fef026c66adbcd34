//! Configuration module for wellplan
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::WellplanPaths;
pub use settings::Settings;
