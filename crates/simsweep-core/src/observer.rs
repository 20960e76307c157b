//! Progress notifications emitted while a sweep runs

use crate::error::HarnessError;
use crate::model::{ConfigKey, ConfigurationResult, ModuleResult, SuiteResult};
use crate::plan::SweepPlan;
use crate::toolchain::ModuleJob;
use std::path::Path;

/// Receives sweep progress in execution order
///
/// Every method has an empty default so implementors pick what they need.
pub trait SweepObserver {
    fn suite_started(&self, _plan: &SweepPlan, _run_root: &Path) {}

    fn configuration_started(&self, _key: ConfigKey) {}

    fn module_started(&self, _job: &ModuleJob) {}

    fn module_finished(&self, _result: &ModuleResult) {}

    fn configuration_finished(&self, _result: &ConfigurationResult) {}

    /// The latest-results alias could not be updated; the run still succeeds
    fn alias_failed(&self, _alias: &Path, _error: &HarnessError) {}

    fn suite_finished(&self, _result: &SuiteResult) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SweepObserver for NullObserver {}
