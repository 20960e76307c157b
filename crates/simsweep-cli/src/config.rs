//! CLI configuration via environment variables
//!
//! Only presentation settings live here; sweep settings come from
//! simsweep-config.

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Disable colored output (SIMSWEEP_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Diagnostic log filter (RUST_LOG)
    pub log_filter: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            no_color: env::var("SIMSWEEP_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
            log_filter: env::var("RUST_LOG").ok().filter(|v| !v.trim().is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
