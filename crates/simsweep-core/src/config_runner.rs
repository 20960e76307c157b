//! Configuration runner - every module id for one (width, depth) pair

use crate::clock::Clock;
use crate::error::HarnessResult;
use crate::layout::RunLayout;
use crate::model::{ConfigKey, ConfigurationResult};
use crate::module_runner::ModuleRunner;
use crate::observer::SweepObserver;
use crate::report;
use crate::toolchain::ModuleJob;
use std::time::Instant;
use tracing::info;

/// Runs module ids `1..=module_count` in ascending order
///
/// There is no fail-fast: every module runs so that every status is known.
pub struct ConfigurationRunner<'a> {
    modules: ModuleRunner<'a>,
    clock: &'a dyn Clock,
    observer: &'a dyn SweepObserver,
}

impl<'a> ConfigurationRunner<'a> {
    pub fn new(
        modules: ModuleRunner<'a>,
        clock: &'a dyn Clock,
        observer: &'a dyn SweepObserver,
    ) -> Self {
        Self {
            modules,
            clock,
            observer,
        }
    }

    /// Run one configuration and write its `report.html`
    pub fn run(
        &self,
        key: ConfigKey,
        module_count: u32,
        layout: &RunLayout,
    ) -> HarnessResult<ConfigurationResult> {
        let config_dir = layout.ensure_config_dir(key)?;
        self.observer.configuration_started(key);

        let start = Instant::now();
        let mut results = Vec::new();
        for module_id in 1..=module_count {
            let job = ModuleJob::new(module_id, key);
            self.observer.module_started(&job);
            let result = self.modules.run(job, &config_dir)?;
            self.observer.module_finished(&result);
            results.push(result);
        }

        let result = ConfigurationResult::from_modules(key, results, start.elapsed());

        let report_path = layout.config_report(key);
        report::write_configuration_report(&result, &report_path, self.clock.now())?;
        info!("wrote {}", report_path.display());

        self.observer.configuration_finished(&result);
        Ok(result)
    }
}
