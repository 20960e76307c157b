//! Result model: module, configuration and suite results
//!
//! Results are write-once. Aggregate counts are computed when an aggregate is
//! built, so `passed + failed == modules.len()` and the suite totals always sum
//! from their children.

use crate::plan::SweepPlan;
use serde::{Serialize, Serializer};
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// One (width, pipeline depth) configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConfigKey {
    pub width: u32,
    pub pipe_stages: u32,
}

impl ConfigKey {
    pub fn new(width: u32, pipe_stages: u32) -> Self {
        Self { width, pipe_stages }
    }

    /// Directory name under the run root, e.g. `w8_p2`
    pub fn dir_name(&self) -> String {
        format!("w{}_p{}", self.width, self.pipe_stages)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WIDTH={}, PIPE_STAGES={}", self.width, self.pipe_stages)
    }
}

/// Terminal classification of one module run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleStatus {
    /// The marker text was found in the module log
    Passed,
    /// Compilation succeeded but the marker text was absent
    Failed,
    /// The toolchain exited non-zero; the artifact was never executed
    CompileFailed,
}

impl ModuleStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, ModuleStatus::Passed)
    }

    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    /// Label used in console tables and HTML reports
    pub fn label(&self) -> &'static str {
        match self {
            ModuleStatus::Passed => "PASSED",
            ModuleStatus::Failed => "FAILED",
            ModuleStatus::CompileFailed => "COMPILE FAILED",
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one compile + execute cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleResult {
    module_id: u32,
    #[serde(flatten)]
    key: ConfigKey,
    status: ModuleStatus,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    duration: Duration,
    log_path: PathBuf,
}

impl ModuleResult {
    pub fn new(
        module_id: u32,
        key: ConfigKey,
        status: ModuleStatus,
        duration: Duration,
        log_path: PathBuf,
    ) -> Self {
        Self {
            module_id,
            key,
            status,
            duration,
            log_path,
        }
    }

    pub fn module_id(&self) -> u32 {
        self.module_id
    }

    pub fn key(&self) -> ConfigKey {
        self.key
    }

    pub fn width(&self) -> u32 {
        self.key.width
    }

    pub fn pipe_stages(&self) -> u32 {
        self.key.pipe_stages
    }

    pub fn status(&self) -> ModuleStatus {
        self.status
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log file name relative to the configuration directory
    pub fn log_file_name(&self) -> String {
        format!("module_{}.log", self.module_id)
    }
}

/// Heat-map pass rate of one configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassRate {
    /// `floor(100 * passed / (passed + failed))`
    Percent(u32),
    /// The configuration ran no modules
    NotApplicable,
}

impl PassRate {
    pub fn from_counts(passed: usize, failed: usize) -> Self {
        let total = passed + failed;
        if total == 0 {
            PassRate::NotApplicable
        } else {
            PassRate::Percent((passed * 100 / total) as u32)
        }
    }

    /// Cell colour, moving from red (0%) to green (100%)
    pub fn heat_color(&self) -> Option<(u8, u8, u8)> {
        match *self {
            PassRate::Percent(rate) => {
                let rate = i64::from(rate);
                let red = (255 - rate * 2).clamp(0, 255) as u8;
                let green = (55 + rate * 2).clamp(0, 255) as u8;
                Some((red, green, 50))
            }
            PassRate::NotApplicable => None,
        }
    }
}

impl fmt::Display for PassRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassRate::Percent(rate) => write!(f, "{}%", rate),
            PassRate::NotApplicable => f.write_str("N/A"),
        }
    }
}

/// Aggregate of all module runs for one configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationResult {
    #[serde(flatten)]
    key: ConfigKey,
    passed: usize,
    failed: usize,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    duration: Duration,
    modules: Vec<ModuleResult>,
}

impl ConfigurationResult {
    /// Aggregate module results; CompileFailed counts as failed
    pub fn from_modules(key: ConfigKey, modules: Vec<ModuleResult>, duration: Duration) -> Self {
        let passed = modules.iter().filter(|m| m.status().is_pass()).count();
        let failed = modules.len() - passed;
        Self {
            key,
            passed,
            failed,
            duration,
            modules,
        }
    }

    pub fn key(&self) -> ConfigKey {
        self.key
    }

    pub fn width(&self) -> u32 {
        self.key.width
    }

    pub fn pipe_stages(&self) -> u32 {
        self.key.pipe_stages
    }

    pub fn passed_count(&self) -> usize {
        self.passed
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Module results in ascending module id order
    pub fn modules(&self) -> &[ModuleResult] {
        &self.modules
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn pass_rate(&self) -> PassRate {
        PassRate::from_counts(self.passed, self.failed)
    }

    /// Plain-text table of module id, status and duration
    pub fn summary_table(&self) -> String {
        let rule = "-".repeat(71);
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_summary_table(&mut out, &rule);
        out
    }

    fn write_summary_table(&self, out: &mut String, rule: &str) -> fmt::Result {
        writeln!(out, "Configuration Summary: {}", self.key)?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "{:<9} | {:<15} | {:<10}", "MODULE", "STATUS", "TIME (sec)")?;
        writeln!(out, "{}", rule)?;
        for module in &self.modules {
            writeln!(
                out,
                "Module {:<2} | {:<15} | {:<10.1}",
                module.module_id(),
                module.status().label(),
                module.duration().as_secs_f64()
            )?;
        }
        writeln!(out, "{}", rule)?;
        writeln!(
            out,
            "{:<9} | {:<15} | {:.1} seconds",
            "TOTAL",
            format!("{} passed, {} failed", self.passed, self.failed),
            self.duration.as_secs_f64()
        )?;
        writeln!(out, "{}", rule)
    }
}

/// Aggregate of a whole sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteResult {
    run_root: PathBuf,
    widths: Vec<u32>,
    pipe_stages: Vec<u32>,
    modules_per_configuration: u32,
    total_tests: usize,
    total_passed: usize,
    total_failed: usize,
    #[serde(rename = "total_duration_secs", serialize_with = "serialize_secs")]
    total_duration: Duration,
    configurations: Vec<ConfigurationResult>,
}

impl SuiteResult {
    /// Aggregate configuration results in execution order
    pub fn new(
        run_root: PathBuf,
        plan: &SweepPlan,
        configurations: Vec<ConfigurationResult>,
        total_duration: Duration,
    ) -> Self {
        let total_passed = configurations.iter().map(|c| c.passed_count()).sum();
        let total_failed = configurations.iter().map(|c| c.failed_count()).sum();
        Self {
            run_root,
            widths: distinct(plan.widths()),
            pipe_stages: distinct(plan.pipe_stages()),
            modules_per_configuration: plan.modules(),
            total_tests: total_passed + total_failed,
            total_passed,
            total_failed,
            total_duration,
            configurations,
        }
    }

    pub fn run_root(&self) -> &Path {
        &self.run_root
    }

    /// Distinct width values, first-seen order
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Distinct pipeline-depth values, first-seen order
    pub fn pipe_stages(&self) -> &[u32] {
        &self.pipe_stages
    }

    pub fn modules_per_configuration(&self) -> u32 {
        self.modules_per_configuration
    }

    pub fn total_tests(&self) -> usize {
        self.total_tests
    }

    pub fn total_passed(&self) -> usize {
        self.total_passed
    }

    pub fn total_failed(&self) -> usize {
        self.total_failed
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn all_passed(&self) -> bool {
        self.total_failed == 0
    }

    /// Every configuration that ran, in execution order
    pub fn configurations(&self) -> &[ConfigurationResult] {
        &self.configurations
    }

    /// The most recent result for a configuration
    pub fn get(&self, key: ConfigKey) -> Option<&ConfigurationResult> {
        self.configurations.iter().rev().find(|c| c.key() == key)
    }

    /// Heat-map rate for a cell; cells that never ran are not applicable
    pub fn pass_rate(&self, key: ConfigKey) -> PassRate {
        self.get(key)
            .map(ConfigurationResult::pass_rate)
            .unwrap_or(PassRate::NotApplicable)
    }
}

fn distinct(values: &[u32]) -> Vec<u32> {
    let mut seen = Vec::with_capacity(values.len());
    for &value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
