//! Run command - sweep the configuration matrix

use crate::reporter::ConsoleReporter;
use anyhow::{Context, Result};
use colored::*;
use simsweep_config::{ConfigLoader, Settings};
use simsweep_core::{ExternalToolchain, NullObserver, SuiteRunner, SweepObserver, ValueList};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Arguments for the run command
#[derive(Debug, Default)]
pub struct RunArgs {
    pub widths: Option<ValueList>,
    pub pipe_stages: Option<ValueList>,
    pub modules: Option<u32>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub toolchain: Option<String>,
    pub marker: Option<String>,
    /// Skip the latest-results alias
    pub no_alias: bool,
    /// Output in JSON format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    pub verbose: bool,
    /// Exit 1 when any module did not pass
    pub strict: bool,
}

impl RunArgs {
    /// Command-line flags override everything the loader produced
    fn apply_to(&self, settings: &mut Settings) -> Result<()> {
        if let Some(widths) = &self.widths {
            settings.widths = widths.clone();
        }
        if let Some(pipe_stages) = &self.pipe_stages {
            settings.pipe_stages = pipe_stages.clone();
        }
        if let Some(modules) = self.modules {
            settings.modules = modules;
        }
        if let Some(dir) = &self.output_dir {
            settings.output_base = dir.clone();
        }
        if let Some(program) = &self.toolchain {
            if program.trim().is_empty() {
                anyhow::bail!("--toolchain cannot be empty");
            }
            settings.toolchain.program = program.clone();
        }
        if let Some(marker) = &self.marker {
            if marker.is_empty() {
                anyhow::bail!("--marker cannot be empty");
            }
            settings.marker = marker.clone();
        }
        if self.no_alias {
            settings.latest_alias = None;
        }
        Ok(())
    }
}

/// Load settings from `--config` or by searching upward from the working directory
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let loader = ConfigLoader::new();
    let settings = match config {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => loader.load_from_directory(&env::current_dir()?)?,
    };
    if let Some(source) = &settings.source {
        debug!("using configuration {}", source.display());
    }
    Ok(settings)
}

/// Run the sweep command
pub fn run(args: RunArgs) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut settings = load_settings(args.config.as_deref())?;
    args.apply_to(&mut settings)?;

    // Every input is validated before the first external process starts.
    let plan = settings.plan()?;

    let toolchain = ExternalToolchain::new(settings.toolchain.clone());
    let reporter = ConsoleReporter::new(args.verbose);
    let observer: &dyn SweepObserver = if args.json {
        &NullObserver
    } else {
        &reporter
    };

    let result = SuiteRunner::new(&toolchain)
        .with_observer(observer)
        .with_marker(settings.marker.clone())
        .with_latest_alias(settings.latest_alias.clone())
        .run(&plan, &settings.output_base)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    if args.no_color {
        colored::control::unset_override();
    }

    if args.strict && !result.all_passed() {
        if !args.json {
            eprintln!(
                "{} {} of {} modules did not pass",
                "error:".red().bold(),
                result.total_failed(),
                result.total_tests()
            );
        }
        std::process::exit(1);
    }

    Ok(())
}
