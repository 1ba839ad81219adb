//! SurfsUp Core Library
//!
//! Shared utilities for the weather API service:
//! - Configuration loading (XDG-compliant)
//! - File system checks
//! - Common defaults

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::{is_directory, path_exists, require_file};

/// Application name used for XDG paths
pub const APP_NAME: &str = "surfsup";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;

/// Default location of the observation database, relative to the working directory
pub const DEFAULT_DATABASE_PATH: &str = "./Resources/hawaii.sqlite";

/// Station served by `/api/v1.0/tobs` when none is configured
pub const DEFAULT_REFERENCE_STATION: &str = "USC00519281";
