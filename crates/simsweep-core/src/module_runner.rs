//! Module runner - one compile + execute cycle, classified by marker text

use crate::error::HarnessResult;
use crate::model::{ModuleResult, ModuleStatus};
use crate::toolchain::{ModuleJob, ModuleLog, Toolchain};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Literal text a simulation must print for its module to pass
pub const DEFAULT_MARKER: &str = "TEST PASSED";

/// Classify a finished module from its combined log
///
/// Only the marker text decides; the simulator's exit status is ignored.
pub fn classify(log_content: &str, marker: &str) -> ModuleStatus {
    if log_content.contains(marker) {
        ModuleStatus::Passed
    } else {
        ModuleStatus::Failed
    }
}

/// Runs a single module through the toolchain
pub struct ModuleRunner<'a> {
    toolchain: &'a dyn Toolchain,
    marker: &'a str,
}

impl<'a> ModuleRunner<'a> {
    pub fn new(toolchain: &'a dyn Toolchain, marker: &'a str) -> Self {
        Self { toolchain, marker }
    }

    /// Compile and execute `job`, logging into `config_dir/module_<id>.log`
    ///
    /// A compile failure skips the execute step. Errors are returned only for
    /// log file I/O; toolchain failures become a [`ModuleStatus`].
    pub fn run(&self, job: ModuleJob, config_dir: &Path) -> HarnessResult<ModuleResult> {
        let log = ModuleLog::create(config_dir.join(format!("module_{}.log", job.module_id)))?;
        let start = Instant::now();

        let compiled = self.toolchain.compile(&job, &log)?;
        if !compiled.success() {
            debug!("module {} compile step ended with {:?}", job.module_id, compiled);
            return Ok(ModuleResult::new(
                job.module_id,
                job.key,
                ModuleStatus::CompileFailed,
                start.elapsed(),
                log.into_path(),
            ));
        }

        let executed = self.toolchain.execute(&job, &log)?;
        debug!("module {} execute step ended with {:?}", job.module_id, executed);

        let status = classify(&log.read_contents()?, self.marker);
        Ok(ModuleResult::new(
            job.module_id,
            job.key,
            status,
            start.elapsed(),
            log.into_path(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfigKey;
    use crate::toolchain::StepStatus;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Stub that records every step it is asked to perform
    struct ScriptedToolchain {
        compile: StepStatus,
        execute: StepStatus,
        output: &'static str,
        steps: RefCell<Vec<&'static str>>,
    }

    impl ScriptedToolchain {
        fn new(compile: StepStatus, execute: StepStatus, output: &'static str) -> Self {
            Self {
                compile,
                execute,
                output,
                steps: RefCell::new(Vec::new()),
            }
        }
    }

    impl Toolchain for ScriptedToolchain {
        fn compile(&self, _job: &ModuleJob, log: &ModuleLog) -> HarnessResult<StepStatus> {
            self.steps.borrow_mut().push("compile");
            log.append_line("%Info: compiling")?;
            Ok(self.compile)
        }

        fn execute(&self, _job: &ModuleJob, log: &ModuleLog) -> HarnessResult<StepStatus> {
            self.steps.borrow_mut().push("execute");
            log.append_line(self.output)?;
            Ok(self.execute)
        }
    }

    fn job() -> ModuleJob {
        ModuleJob::new(1, ConfigKey::new(8, 2))
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("... TEST PASSED ...", DEFAULT_MARKER), ModuleStatus::Passed);
        assert_eq!(classify("TEST FAILED", DEFAULT_MARKER), ModuleStatus::Failed);
        assert_eq!(classify("", DEFAULT_MARKER), ModuleStatus::Failed);
        assert_eq!(classify("test passed", DEFAULT_MARKER), ModuleStatus::Failed);
    }

    #[test]
    fn test_marker_passes() {
        let temp = TempDir::new().unwrap();
        let toolchain = ScriptedToolchain::new(StepStatus::Success, StepStatus::Success, "TEST PASSED");
        let result = ModuleRunner::new(&toolchain, DEFAULT_MARKER)
            .run(job(), temp.path())
            .unwrap();

        assert_eq!(result.status(), ModuleStatus::Passed);
        assert_eq!(result.log_path(), temp.path().join("module_1.log"));
        assert_eq!(*toolchain.steps.borrow(), vec!["compile", "execute"]);
    }

    #[test]
    fn test_exit_status_is_ignored_when_marker_present() {
        let temp = TempDir::new().unwrap();
        let toolchain = ScriptedToolchain::new(
            StepStatus::Success,
            StepStatus::Failure(Some(1)),
            "TEST PASSED",
        );
        let result = ModuleRunner::new(&toolchain, DEFAULT_MARKER)
            .run(job(), temp.path())
            .unwrap();

        assert_eq!(result.status(), ModuleStatus::Passed);
    }

    #[test]
    fn test_clean_exit_without_marker_fails() {
        let temp = TempDir::new().unwrap();
        let toolchain = ScriptedToolchain::new(StepStatus::Success, StepStatus::Success, "done");
        let result = ModuleRunner::new(&toolchain, DEFAULT_MARKER)
            .run(job(), temp.path())
            .unwrap();

        assert_eq!(result.status(), ModuleStatus::Failed);
    }

    #[test]
    fn test_compile_failure_skips_execute() {
        let temp = TempDir::new().unwrap();
        let toolchain = ScriptedToolchain::new(
            StepStatus::Failure(Some(1)),
            StepStatus::Success,
            "TEST PASSED",
        );
        let result = ModuleRunner::new(&toolchain, DEFAULT_MARKER)
            .run(job(), temp.path())
            .unwrap();

        assert_eq!(result.status(), ModuleStatus::CompileFailed);
        assert_eq!(*toolchain.steps.borrow(), vec!["compile"]);
    }

    #[test]
    fn test_unstartable_compiler_is_compile_failure() {
        let temp = TempDir::new().unwrap();
        let toolchain = ScriptedToolchain::new(StepStatus::NotStarted, StepStatus::Success, "");
        let result = ModuleRunner::new(&toolchain, DEFAULT_MARKER)
            .run(job(), temp.path())
            .unwrap();

        assert_eq!(result.status(), ModuleStatus::CompileFailed);
    }

    #[test]
    fn test_custom_marker() {
        let temp = TempDir::new().unwrap();
        let toolchain = ScriptedToolchain::new(StepStatus::Success, StepStatus::Success, "ALL GOOD");
        let result = ModuleRunner::new(&toolchain, "ALL GOOD")
            .run(job(), temp.path())
            .unwrap();

        assert_eq!(result.status(), ModuleStatus::Passed);
    }

    #[test]
    fn test_missing_config_dir_is_an_error() {
        let temp = TempDir::new().unwrap();
        let toolchain = ScriptedToolchain::new(StepStatus::Success, StepStatus::Success, "");
        let result = ModuleRunner::new(&toolchain, DEFAULT_MARKER)
            .run(job(), &temp.path().join("missing"));

        assert!(result.is_err());
        assert!(toolchain.steps.borrow().is_empty());
    }
}
