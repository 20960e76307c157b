//! simsweep core
//!
//! Drives an external simulator toolchain across a matrix of
//! (width, pipeline depth) configurations and module ids, classifies each
//! module run from its log, and aggregates the results into per-configuration
//! and suite-level reports.
//!
//! # Layers
//!
//! Execution is strictly serial and composes top-down:
//! 1. [`SuiteRunner`] - iterates every (width, depth) pair of a [`SweepPlan`]
//! 2. [`ConfigurationRunner`] - iterates module ids `1..=modules` for one pair
//! 3. [`ModuleRunner`] - one compile + execute cycle, classified by marker text
//!
//! # Example
//!
//! ```no_run
//! use simsweep_core::{ExternalToolchain, SuiteRunner, SweepPlan, ToolchainSpec};
//! use std::path::Path;
//!
//! let plan = SweepPlan::new(vec![8, 16], vec![2, 3, 4], 25).unwrap();
//! let toolchain = ExternalToolchain::new(ToolchainSpec::default());
//! let result = SuiteRunner::new(&toolchain).run(&plan, Path::new(".")).unwrap();
//! println!("{} of {} passed", result.total_passed(), result.total_tests());
//! ```

pub mod alias;
pub mod clock;
pub mod config_runner;
pub mod error;
pub mod layout;
pub mod model;
pub mod module_runner;
pub mod observer;
pub mod plan;
pub mod report;
pub mod suite_runner;
pub mod toolchain;

pub use alias::{resolve_latest, update_latest, LATEST_ALIAS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config_runner::ConfigurationRunner;
pub use error::{HarnessError, HarnessResult};
pub use layout::RunLayout;
pub use model::{ConfigKey, ConfigurationResult, ModuleResult, ModuleStatus, PassRate, SuiteResult};
pub use module_runner::{classify, ModuleRunner, DEFAULT_MARKER};
pub use observer::{NullObserver, SweepObserver};
pub use plan::{SweepPlan, ValueList};
pub use suite_runner::SuiteRunner;
pub use toolchain::{ExternalToolchain, ModuleJob, ModuleLog, StepStatus, Toolchain, ToolchainSpec};
