//! Output directory layout of one run
//!
//! ```text
//! <run_root>/dashboard.html
//! <run_root>/w<width>_p<depth>/report.html
//! <run_root>/w<width>_p<depth>/module_<id>.log
//! ```

use crate::error::{HarnessError, HarnessResult};
use crate::model::ConfigKey;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of timestamped run-root directory names
pub const RUN_ROOT_PREFIX: &str = "simulation_logs_";

/// Name of the suite-level report
pub const DASHBOARD_FILE: &str = "dashboard.html";

/// Name of each per-configuration report
pub const CONFIG_REPORT_FILE: &str = "report.html";

/// Directory name for a run started at `timestamp`
pub fn run_root_name(timestamp: DateTime<Local>) -> String {
    format!(
        "{}{}",
        RUN_ROOT_PREFIX,
        timestamp.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Paths of one run's output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    root: PathBuf,
}

impl RunLayout {
    /// Use an explicit run root; nothing is created until the run starts
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a fresh timestamped run root under `base`
    ///
    /// When a root with the same timestamp already exists, `_1`, `_2`, ... is
    /// appended so two runs never share a directory.
    pub fn allocate(base: &Path, timestamp: DateTime<Local>) -> HarnessResult<Self> {
        fs::create_dir_all(base).map_err(|e| HarnessError::io(base, e))?;

        let name = run_root_name(timestamp);
        let mut candidate = base.join(&name);
        let mut suffix = 0u32;

        loop {
            match fs::create_dir(&candidate) {
                Ok(()) => {
                    debug!("allocated run root {}", candidate.display());
                    return Ok(Self { root: candidate });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    suffix += 1;
                    candidate = base.join(format!("{}_{}", name, suffix));
                }
                Err(e) => return Err(HarnessError::io(&candidate, e)),
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the run root if it does not exist yet
    pub fn ensure_root(&self) -> HarnessResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| HarnessError::io(&self.root, e))
    }

    pub fn config_dir(&self, key: ConfigKey) -> PathBuf {
        self.root.join(key.dir_name())
    }

    /// Create the configuration directory (idempotent)
    pub fn ensure_config_dir(&self, key: ConfigKey) -> HarnessResult<PathBuf> {
        let dir = self.config_dir(key);
        fs::create_dir_all(&dir).map_err(|e| HarnessError::io(&dir, e))?;
        Ok(dir)
    }

    pub fn module_log(&self, key: ConfigKey, module_id: u32) -> PathBuf {
        self.config_dir(key)
            .join(format!("module_{}.log", module_id))
    }

    pub fn config_report(&self, key: ConfigKey) -> PathBuf {
        self.config_dir(key).join(CONFIG_REPORT_FILE)
    }

    pub fn dashboard(&self) -> PathBuf {
        self.root.join(DASHBOARD_FILE)
    }
}
