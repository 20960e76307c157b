//! External toolchain invocation
//!
//! A module run is two external steps: compile the testbench with the
//! configuration defines, then execute the produced artifact. Both steps write
//! stdout and stderr into the same per-module log file.

use crate::error::{HarnessError, HarnessResult};
use crate::model::ConfigKey;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// One (module, width, pipeline depth) triple to compile and run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleJob {
    pub module_id: u32,
    pub key: ConfigKey,
}

impl ModuleJob {
    pub fn new(module_id: u32, key: ConfigKey) -> Self {
        Self { module_id, key }
    }

    /// Deterministic artifact name encoding all three parameters
    pub fn artifact_name(&self) -> String {
        format!(
            "sim_w{}_p{}_m{}.exe",
            self.key.width, self.key.pipe_stages, self.module_id
        )
    }

    /// Configuration-specific preprocessor defines
    pub fn defines(&self) -> [String; 3] {
        [
            format!("+define+MODULE_ID={}", self.module_id),
            format!("+define+WIDTH={}", self.key.width),
            format!("+define+PIPE_STAGES={}", self.key.pipe_stages),
        ]
    }
}

/// Per-module log file shared by both steps
///
/// Opened once in append mode and truncated, so the compile and execute output
/// land in order in a single file.
#[derive(Debug)]
pub struct ModuleLog {
    file: File,
    path: PathBuf,
}

impl ModuleLog {
    pub fn create(path: impl Into<PathBuf>) -> HarnessResult<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| HarnessError::io(&path, e))?;
        file.set_len(0).map_err(|e| HarnessError::io(&path, e))?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// A handle a child process can write stdout or stderr into
    pub fn stdio(&self) -> HarnessResult<Stdio> {
        let handle = self
            .file
            .try_clone()
            .map_err(|e| HarnessError::io(&self.path, e))?;
        Ok(Stdio::from(handle))
    }

    pub fn append_line(&self, line: &str) -> HarnessResult<()> {
        let mut file = &self.file;
        writeln!(file, "{}", line).map_err(|e| HarnessError::io(&self.path, e))
    }

    /// Full log content; invalid UTF-8 is replaced rather than rejected
    pub fn read_contents(&self) -> HarnessResult<String> {
        let bytes = fs::read(&self.path).map_err(|e| HarnessError::io(&self.path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Outcome of one external step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Exit status zero
    Success,
    /// Non-zero exit; `None` when terminated by a signal
    Failure(Option<i32>),
    /// The process could not be spawned
    NotStarted,
}

impl StepStatus {
    pub fn success(&self) -> bool {
        matches!(self, StepStatus::Success)
    }
}

/// The external compile/execute collaborator
pub trait Toolchain {
    /// Compile `job`, appending all output to `log`
    fn compile(&self, job: &ModuleJob, log: &ModuleLog) -> HarnessResult<StepStatus>;

    /// Execute the artifact produced by [`Toolchain::compile`]
    fn execute(&self, job: &ModuleJob, log: &ModuleLog) -> HarnessResult<StepStatus>;
}

fn default_program() -> String {
    "verilator".to_string()
}

fn default_flags() -> Vec<String> {
    [
        "--binary",
        "--timing",
        "--assert",
        "--autoflush",
        "-j",
        "2",
        "-sv",
        "-Wno-CASEINCOMPLETE",
        "-Wno-REALCVT",
        "-Wno-SELRANGE",
        "-Wno-TIMESCALEMOD",
        "-Wno-UNSIGNED",
        "-Wno-WIDTH",
        "-CFLAGS",
        "-O1",
        "-Wno-fatal",
        "--trace-structs",
        "--trace-params",
        "--trace-fst",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_defines() -> Vec<String> {
    vec!["SIMULATION".to_string()]
}

fn default_top() -> String {
    "tb_pipelined_arithmetic".to_string()
}

fn default_sources() -> Vec<PathBuf> {
    vec![
        PathBuf::from("arithmetic_modules.sv"),
        PathBuf::from("pipelined_arithmetic.sv"),
        PathBuf::from("tb_pipelined_arithmetic.sv"),
    ]
}

fn default_obj_dir() -> PathBuf {
    PathBuf::from("obj_dir")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

/// How to invoke the external compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainSpec {
    /// Compiler executable
    pub program: String,
    /// Fixed flags passed on every compile
    pub flags: Vec<String>,
    /// Extra fixed defines (`+define+NAME`)
    pub defines: Vec<String>,
    /// Top-level testbench module
    pub top: String,
    /// Source files, relative to `work_dir`
    pub sources: Vec<PathBuf>,
    /// Directory the compiler writes artifacts to, relative to `work_dir`
    pub obj_dir: PathBuf,
    /// Working directory for both steps
    pub work_dir: PathBuf,
}

impl Default for ToolchainSpec {
    fn default() -> Self {
        Self {
            program: default_program(),
            flags: default_flags(),
            defines: default_defines(),
            top: default_top(),
            sources: default_sources(),
            obj_dir: default_obj_dir(),
            work_dir: default_work_dir(),
        }
    }
}

impl ToolchainSpec {
    /// Full compile argument list for `job`
    pub fn compile_args(&self, job: &ModuleJob) -> Vec<String> {
        let mut args = self.flags.clone();
        args.push("-top".to_string());
        args.push(self.top.clone());
        args.push("-o".to_string());
        args.push(job.artifact_name());
        args.extend(self.defines.iter().map(|d| format!("+define+{}", d)));
        args.extend(job.defines());
        args.extend(self.sources.iter().map(|s| s.display().to_string()));
        args
    }

    /// Where the compiled artifact for `job` lands
    pub fn artifact_path(&self, job: &ModuleJob) -> PathBuf {
        self.work_dir.join(&self.obj_dir).join(job.artifact_name())
    }
}

/// Toolchain backed by real processes
#[derive(Debug, Clone)]
pub struct ExternalToolchain {
    spec: ToolchainSpec,
}

impl ExternalToolchain {
    pub fn new(spec: ToolchainSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &ToolchainSpec {
        &self.spec
    }

    /// Run `command` to completion with its output redirected into `log`
    fn run_logged(&self, step: &str, mut command: Command, log: &ModuleLog) -> HarnessResult<StepStatus> {
        command
            .current_dir(&self.spec.work_dir)
            .stdin(Stdio::null())
            .stdout(log.stdio()?)
            .stderr(log.stdio()?);

        debug!("{} step: {:?}", step, command);

        match command.status() {
            Ok(status) if status.success() => Ok(StepStatus::Success),
            Ok(status) => Ok(StepStatus::Failure(status.code())),
            Err(error) => {
                warn!(
                    "failed to start {} step for {}: {}",
                    step,
                    log.path().display(),
                    error
                );
                log.append_line(&format!("simsweep: failed to start {} step: {}", step, error))?;
                Ok(StepStatus::NotStarted)
            }
        }
    }
}

impl Toolchain for ExternalToolchain {
    fn compile(&self, job: &ModuleJob, log: &ModuleLog) -> HarnessResult<StepStatus> {
        let mut command = Command::new(&self.spec.program);
        command.args(self.spec.compile_args(job));
        self.run_logged("compile", command, log)
    }

    fn execute(&self, job: &ModuleJob, log: &ModuleLog) -> HarnessResult<StepStatus> {
        // Relative program paths combined with current_dir are ambiguous.
        let mut artifact = self.spec.artifact_path(job);
        if artifact.is_relative() {
            let cwd = env::current_dir().map_err(|e| HarnessError::io(".", e))?;
            artifact = cwd.join(artifact);
        }
        self.run_logged("execute", Command::new(artifact), log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn job() -> ModuleJob {
        ModuleJob::new(5, ConfigKey::new(16, 3))
    }

    #[test]
    fn test_artifact_name() {
        assert_eq!(job().artifact_name(), "sim_w16_p3_m5.exe");
    }

    #[test]
    fn test_compile_args_carry_defines_and_artifact() {
        let spec = ToolchainSpec::default();
        let args = spec.compile_args(&job());

        assert_eq!(&args[..2], &["--binary".to_string(), "--timing".to_string()]);
        let top = args.iter().position(|a| a == "-top").unwrap();
        assert_eq!(args[top + 1], "tb_pipelined_arithmetic");
        let out = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[out + 1], "sim_w16_p3_m5.exe");
        assert!(args.contains(&"+define+SIMULATION".to_string()));
        assert!(args.contains(&"+define+MODULE_ID=5".to_string()));
        assert!(args.contains(&"+define+WIDTH=16".to_string()));
        assert!(args.contains(&"+define+PIPE_STAGES=3".to_string()));
        assert_eq!(args.last().unwrap(), "tb_pipelined_arithmetic.sv");
    }

    #[test]
    fn test_artifact_path() {
        let spec = ToolchainSpec {
            work_dir: PathBuf::from("/work"),
            ..ToolchainSpec::default()
        };
        assert_eq!(
            spec.artifact_path(&job()),
            PathBuf::from("/work/obj_dir/sim_w16_p3_m5.exe")
        );
    }

    #[test]
    fn test_module_log_truncates_and_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("module_1.log");
        fs::write(&path, "stale output from an earlier run\n").unwrap();

        let log = ModuleLog::create(&path).unwrap();
        log.append_line("first").unwrap();
        log.append_line("second").unwrap();

        assert_eq!(log.read_contents().unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_missing_program_is_not_started() {
        let temp = TempDir::new().unwrap();
        let spec = ToolchainSpec {
            program: "simsweep-definitely-missing-compiler".to_string(),
            work_dir: temp.path().to_path_buf(),
            ..ToolchainSpec::default()
        };
        let toolchain = ExternalToolchain::new(spec);
        let log = ModuleLog::create(temp.path().join("module_5.log")).unwrap();

        let status = toolchain.compile(&job(), &log).unwrap();

        assert_eq!(status, StepStatus::NotStarted);
        assert!(log
            .read_contents()
            .unwrap()
            .contains("failed to start compile step"));
    }

    #[cfg(unix)]
    #[test]
    fn test_external_output_lands_in_log() {
        let temp = TempDir::new().unwrap();
        let spec = ToolchainSpec {
            program: "sh".to_string(),
            flags: vec!["-c".to_string(), "echo compiling; echo oops >&2; exit 3".to_string()],
            work_dir: temp.path().to_path_buf(),
            ..ToolchainSpec::default()
        };
        let toolchain = ExternalToolchain::new(spec);
        let log = ModuleLog::create(temp.path().join("module_5.log")).unwrap();

        let status = toolchain.compile(&job(), &log).unwrap();

        assert_eq!(status, StepStatus::Failure(Some(3)));
        let content = log.read_contents().unwrap();
        assert!(content.contains("compiling"));
        assert!(content.contains("oops"));
    }
}
