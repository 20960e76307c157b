/// Harness error types
use std::path::PathBuf;
use thiserror::Error;

pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that stop a sweep.
///
/// Compile and runtime failures of individual modules are not errors: they are
/// recorded as a [`crate::ModuleStatus`] and the sweep continues.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Invalid value list '{input}': {reason}")]
    InvalidList { input: String, reason: String },

    #[error("Invalid sweep plan: {0}")]
    InvalidPlan(String),

    #[error("I/O error at {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Cannot update latest-results alias {path}: {reason}")]
    Alias { path: PathBuf, reason: String },

    #[error("No latest run recorded at {0}")]
    NoLatestRun(PathBuf),
}

impl HarnessError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }

    /// Create a value list parse error
    pub fn invalid_list(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidList {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an alias update error
    pub fn alias(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Alias {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
