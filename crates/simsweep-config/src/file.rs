//! Sweep configuration file (simsweep.toml)

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of simsweep.toml; every field is optional
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct SweepFile {
    /// Matrix to sweep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepSection>,

    /// External compiler invocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<ToolchainSection>,

    /// Output locations and pass marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSection>,
}

/// `[sweep]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct SweepSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widths: Option<Vec<u32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipe_stages: Option<Vec<u32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<u32>,
}

/// `[toolchain]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ToolchainSection {
    /// Compiler executable (default: verilator)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Fixed compiler flags, replacing the built-in set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,

    /// Extra fixed defines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defines: Option<Vec<String>>,

    /// Top-level testbench module
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<PathBuf>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub obj_dir: Option<PathBuf>,

    /// Working directory; relative paths resolve against the file's directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
}

/// `[output]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Directory that receives timestamped run roots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Path of the latest-results alias
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_alias: Option<PathBuf>,

    /// Text that marks a module as passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

impl SweepFile {
    /// Load and validate a configuration file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let file: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        file.validate()?;
        Ok(file)
    }

    /// Apply the same rules the command line enforces
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(sweep) = &self.sweep {
            if matches!(&sweep.widths, Some(w) if w.is_empty()) {
                return Err(ConfigError::invalid(
                    "sweep.widths",
                    "at least one width value must be specified",
                ));
            }
            if matches!(&sweep.pipe_stages, Some(p) if p.is_empty()) {
                return Err(ConfigError::invalid(
                    "sweep.pipe_stages",
                    "at least one pipeline-depth value must be specified",
                ));
            }
            if sweep.modules == Some(0) {
                return Err(ConfigError::invalid(
                    "sweep.modules",
                    "module count must be at least 1",
                ));
            }
        }

        if let Some(toolchain) = &self.toolchain {
            if matches!(&toolchain.program, Some(p) if p.trim().is_empty()) {
                return Err(ConfigError::invalid(
                    "toolchain.program",
                    "program cannot be empty",
                ));
            }
            if matches!(&toolchain.top, Some(t) if t.trim().is_empty()) {
                return Err(ConfigError::invalid("toolchain.top", "top cannot be empty"));
            }
        }

        if let Some(output) = &self.output {
            if matches!(&output.marker, Some(m) if m.is_empty()) {
                return Err(ConfigError::invalid("output.marker", "marker cannot be empty"));
            }
        }

        Ok(())
    }
}
