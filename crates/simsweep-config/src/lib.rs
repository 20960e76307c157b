//! simsweep configuration
//!
//! Settings for a sweep are merged from several sources (later overrides
//! earlier):
//! 1. Built-in defaults
//! 2. `simsweep.toml`, found by walking up from the working directory
//! 3. Environment variables (`SIMSWEEP_*`)
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use simsweep_config::ConfigLoader;
//! use std::path::Path;
//!
//! let settings = ConfigLoader::new().load_from_directory(Path::new(".")).unwrap();
//! let plan = settings.plan().unwrap();
//! ```

pub mod file;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use file::SweepFile;
pub use loader::{ConfigLoader, Settings, CONFIG_FILE};
