//! Configuration loading and precedence tests

use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use simsweep_config::{ConfigError, ConfigLoader, CONFIG_FILE};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join(CONFIG_FILE);
    fs::write(&config_path, content).unwrap();
    config_path
}

fn clear_env() {
    env::remove_var("SIMSWEEP_TOOLCHAIN");
    env::remove_var("SIMSWEEP_MARKER");
    env::remove_var("SIMSWEEP_OUTPUT_DIR");
}

// ============================================================================
// Loading
// ============================================================================

#[test]
#[serial]
fn test_load_basic_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[sweep]
widths = [4, 8, 12]
pipe_stages = [1]
modules = 2
"#,
    );

    let settings = ConfigLoader::new().load_from_directory(temp_dir.path()).unwrap();
    let plan = settings.plan().unwrap();

    assert_eq!(plan.widths(), &[4, 8, 12]);
    assert_eq!(plan.pipe_stages(), &[1]);
    assert_eq!(plan.total_tests(), 6);
    assert_eq!(settings.source, Some(path));
}

#[test]
#[serial]
fn test_load_without_file_uses_defaults() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    let settings = ConfigLoader::new().load_from_directory(temp_dir.path()).unwrap();

    assert_eq!(settings.source, None);
    assert_eq!(settings.modules, 25);
    assert_eq!(settings.toolchain.program, "verilator");
}

#[test]
#[serial]
fn test_load_from_subdirectory_finds_parent() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[sweep]\nmodules = 7\n");

    let nested = temp_dir.path().join("rtl").join("tb");
    fs::create_dir_all(&nested).unwrap();

    let settings = ConfigLoader::new().load_from_directory(&nested).unwrap();

    assert_eq!(settings.modules, 7);
    assert_eq!(settings.toolchain.work_dir, temp_dir.path());
}

#[test]
#[serial]
fn test_explicit_file_must_exist() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let result = ConfigLoader::new().load_from_file(&missing);

    assert!(matches!(result, Err(ConfigError::NotFound(path)) if path == missing));
}

#[test]
#[serial]
fn test_invalid_toml_reports_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[sweep\nwidths = [8]\n");

    let result = ConfigLoader::new().load_from_file(&path);

    match result {
        Err(ConfigError::TomlParseError { file, .. }) => assert_eq!(file, path),
        other => panic!("expected TomlParseError, got {:?}", other),
    }
}

#[rstest]
#[case("[sweep]\nwidths = []\n", "sweep.widths")]
#[case("[sweep]\npipe_stages = []\n", "sweep.pipe_stages")]
#[case("[sweep]\nmodules = 0\n", "sweep.modules")]
#[case("[toolchain]\nprogram = \"  \"\n", "toolchain.program")]
#[case("[output]\nmarker = \"\"\n", "output.marker")]
#[serial]
fn test_invalid_values_rejected(#[case] content: &str, #[case] expected_field: &str) {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), content);

    match ConfigLoader::new().load_from_file(&path) {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_toolchain_section_overrides_defaults() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[toolchain]
program = "iverilog-wrapper"
flags = ["--fast"]
top = "tb_alu"
sources = ["alu.sv", "tb_alu.sv"]
obj_dir = "build"
"#,
    );

    let settings = ConfigLoader::new().load_from_file(&path).unwrap();
    let spec = &settings.toolchain;

    assert_eq!(spec.program, "iverilog-wrapper");
    assert_eq!(spec.flags, vec!["--fast".to_string()]);
    assert_eq!(spec.top, "tb_alu");
    assert_eq!(spec.sources.len(), 2);
    assert_eq!(spec.obj_dir, PathBuf::from("build"));
    assert_eq!(spec.work_dir, temp_dir.path());
}

// ============================================================================
// Environment overrides
// ============================================================================

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[toolchain]
program = "from-file"

[output]
marker = "FILE MARKER"
"#,
    );

    env::set_var("SIMSWEEP_TOOLCHAIN", "from-env");
    env::set_var("SIMSWEEP_MARKER", "ENV MARKER");
    env::set_var("SIMSWEEP_OUTPUT_DIR", "/tmp/simsweep-runs");

    let settings = ConfigLoader::new().load_from_directory(temp_dir.path()).unwrap();
    clear_env();

    assert_eq!(settings.toolchain.program, "from-env");
    assert_eq!(settings.marker, "ENV MARKER");
    assert_eq!(settings.output_base, PathBuf::from("/tmp/simsweep-runs"));
}

#[test]
#[serial]
fn test_empty_env_marker_rejected() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    env::set_var("SIMSWEEP_MARKER", "");
    let result = ConfigLoader::new().load_from_directory(temp_dir.path());
    clear_env();

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { field, .. }) if field == "SIMSWEEP_MARKER"
    ));
}
