//! Suite runner - the full (width × depth) matrix

use crate::alias;
use crate::clock::{Clock, SystemClock};
use crate::config_runner::ConfigurationRunner;
use crate::error::HarnessResult;
use crate::layout::RunLayout;
use crate::model::SuiteResult;
use crate::module_runner::{ModuleRunner, DEFAULT_MARKER};
use crate::observer::{NullObserver, SweepObserver};
use crate::plan::SweepPlan;
use crate::report;
use crate::toolchain::Toolchain;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

static SYSTEM_CLOCK: SystemClock = SystemClock;
static NULL_OBSERVER: NullObserver = NullObserver;

/// Sweep runner with configuration
pub struct SuiteRunner<'a> {
    toolchain: &'a dyn Toolchain,
    clock: &'a dyn Clock,
    observer: &'a dyn SweepObserver,
    marker: String,
    latest_alias: Option<PathBuf>,
}

impl<'a> SuiteRunner<'a> {
    /// Create a runner with the system clock, no observer, the default
    /// marker and a `latest_results` alias in the working directory
    pub fn new(toolchain: &'a dyn Toolchain) -> Self {
        Self {
            toolchain,
            clock: &SYSTEM_CLOCK,
            observer: &NULL_OBSERVER,
            marker: DEFAULT_MARKER.to_string(),
            latest_alias: Some(PathBuf::from(alias::LATEST_ALIAS)),
        }
    }

    /// Set the time source for run-root names and report dates
    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Set the progress observer
    pub fn with_observer(mut self, observer: &'a dyn SweepObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Set the text whose presence marks a module as passed
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Set where the latest-results alias lives; `None` disables it
    pub fn with_latest_alias(mut self, alias: Option<PathBuf>) -> Self {
        self.latest_alias = alias;
        self
    }

    /// Run the sweep in a fresh timestamped root under `output_base`
    pub fn run(&self, plan: &SweepPlan, output_base: &Path) -> HarnessResult<SuiteResult> {
        let layout = RunLayout::allocate(output_base, self.clock.now())?;
        self.run_in(plan, &layout)
    }

    /// Run the sweep into an explicit run root
    pub fn run_in(&self, plan: &SweepPlan, layout: &RunLayout) -> HarnessResult<SuiteResult> {
        layout.ensure_root()?;
        info!("run root {}", layout.root().display());
        self.observer.suite_started(plan, layout.root());

        let start = Instant::now();
        let runner = ConfigurationRunner::new(
            ModuleRunner::new(self.toolchain, &self.marker),
            self.clock,
            self.observer,
        );

        let mut configurations = Vec::with_capacity(plan.configuration_count());
        for key in plan.configurations() {
            configurations.push(runner.run(key, plan.modules(), layout)?);
        }

        let result = SuiteResult::new(
            layout.root().to_path_buf(),
            plan,
            configurations,
            start.elapsed(),
        );

        let dashboard = layout.dashboard();
        report::write_dashboard(&result, &dashboard, self.clock.now())?;
        info!("wrote {}", dashboard.display());

        if let Some(alias_path) = &self.latest_alias {
            if let Err(error) = alias::update_latest(alias_path, layout.root()) {
                warn!("could not update latest-results alias: {}", error);
                self.observer.alias_failed(alias_path, &error);
            }
        }

        self.observer.suite_finished(&result);
        Ok(result)
    }
}
