//! Configuration Loader
//!
//! Merges built-in defaults, simsweep.toml and `SIMSWEEP_*` environment
//! variables into one [`Settings`] value.

use crate::file::SweepFile;
use crate::{ConfigError, ConfigResult};
use simsweep_core::{HarnessResult, SweepPlan, ToolchainSpec, ValueList, DEFAULT_MARKER, LATEST_ALIAS};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for
pub const CONFIG_FILE: &str = "simsweep.toml";

/// Effective settings for one sweep
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub widths: ValueList,
    pub pipe_stages: ValueList,
    pub modules: u32,
    pub toolchain: ToolchainSpec,
    /// Directory that receives timestamped run roots
    pub output_base: PathBuf,
    /// `None` disables the latest-results alias
    pub latest_alias: Option<PathBuf>,
    pub marker: String,
    /// The configuration file these settings came from, if any
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            widths: ValueList::from(vec![8, 16]),
            pipe_stages: ValueList::from(vec![2, 3, 4]),
            modules: 25,
            toolchain: ToolchainSpec::default(),
            output_base: PathBuf::from("."),
            latest_alias: Some(PathBuf::from(LATEST_ALIAS)),
            marker: DEFAULT_MARKER.to_string(),
            source: None,
        }
    }
}

impl Settings {
    /// Validated sweep plan for these settings
    pub fn plan(&self) -> HarnessResult<SweepPlan> {
        SweepPlan::new(
            self.widths.clone().into_vec(),
            self.pipe_stages.clone().into_vec(),
            self.modules,
        )
    }

    /// Overlay a parsed file; relative paths resolve against `base`
    fn apply_file(&mut self, file: SweepFile, base: &Path) {
        if let Some(sweep) = file.sweep {
            if let Some(widths) = sweep.widths {
                self.widths = ValueList::from(widths);
            }
            if let Some(pipe_stages) = sweep.pipe_stages {
                self.pipe_stages = ValueList::from(pipe_stages);
            }
            if let Some(modules) = sweep.modules {
                self.modules = modules;
            }
        }

        if let Some(toolchain) = file.toolchain {
            let spec = &mut self.toolchain;
            if let Some(program) = toolchain.program {
                spec.program = program;
            }
            if let Some(flags) = toolchain.flags {
                spec.flags = flags;
            }
            if let Some(defines) = toolchain.defines {
                spec.defines = defines;
            }
            if let Some(top) = toolchain.top {
                spec.top = top;
            }
            if let Some(sources) = toolchain.sources {
                spec.sources = sources;
            }
            if let Some(obj_dir) = toolchain.obj_dir {
                spec.obj_dir = obj_dir;
            }
            spec.work_dir = match toolchain.work_dir {
                Some(dir) => base.join(dir),
                None => base.to_path_buf(),
            };
        } else {
            self.toolchain.work_dir = base.to_path_buf();
        }

        if let Some(output) = file.output {
            if let Some(base_dir) = output.base_dir {
                self.output_base = base.join(base_dir);
            }
            if let Some(alias) = output.latest_alias {
                self.latest_alias = Some(base.join(alias));
            }
            if let Some(marker) = output.marker {
                self.marker = marker;
            }
        }
    }
}

/// Configuration loader
///
/// Precedence, lowest first:
/// 1. Built-in defaults
/// 2. Project file (simsweep.toml)
/// 3. Environment variables (SIMSWEEP_*)
/// 4. CLI flags (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Walk up from `start_dir` looking for simsweep.toml
    ///
    /// Falls back to defaults when no file is found.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Settings> {
        let mut settings = Settings::default();

        if let Some(config_path) = Self::find_config_file(start_dir) {
            let file = SweepFile::load_from_file(&config_path)?;
            let base = config_path.parent().unwrap_or(start_dir).to_path_buf();
            settings.apply_file(file, &base);
            settings.source = Some(config_path);
        }

        self.apply_env_overrides(settings)
    }

    /// Load a specific configuration file; it must exist
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Settings> {
        let file = SweepFile::load_from_file(config_path)?;
        let base = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut settings = Settings::default();
        settings.apply_file(file, &base);
        settings.source = Some(config_path.to_path_buf());

        self.apply_env_overrides(settings)
    }

    fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// SIMSWEEP_TOOLCHAIN, SIMSWEEP_MARKER and SIMSWEEP_OUTPUT_DIR
    fn apply_env_overrides(&self, mut settings: Settings) -> ConfigResult<Settings> {
        if let Ok(program) = env::var("SIMSWEEP_TOOLCHAIN") {
            if program.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "SIMSWEEP_TOOLCHAIN",
                    "program cannot be empty",
                ));
            }
            settings.toolchain.program = program;
        }

        if let Ok(marker) = env::var("SIMSWEEP_MARKER") {
            if marker.is_empty() {
                return Err(ConfigError::invalid("SIMSWEEP_MARKER", "marker cannot be empty"));
            }
            settings.marker = marker;
        }

        if let Ok(dir) = env::var("SIMSWEEP_OUTPUT_DIR") {
            if !dir.is_empty() {
                settings.output_base = PathBuf::from(dir);
            }
        }

        Ok(settings)
    }
}
