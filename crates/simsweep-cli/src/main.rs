use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use simsweep_core::ValueList;
use std::io;
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod reporter;

/// Sweep an external simulator over width and pipeline-depth configurations.
///
/// Every (width, pipeline depth) pair is compiled and executed once per module
/// id. Module logs, one HTML report per configuration and a summary dashboard
/// with a pass-rate heat map are written into a timestamped run directory.
///
/// EXAMPLES:
///     simsweep run                              Sweep the default matrix
///     simsweep run --widths 8,32 --modules 4    Custom matrix
///     simsweep run --config ci/simsweep.toml    Explicit configuration file
///     simsweep latest                           Print the most recent run directory
///
/// ENVIRONMENT VARIABLES:
///     SIMSWEEP_WIDTHS        Default width list (comma separated)
///     SIMSWEEP_PIPE_STAGES   Default pipeline-depth list (comma separated)
///     SIMSWEEP_MODULES       Default module count
///     SIMSWEEP_TOOLCHAIN     Compiler executable
///     SIMSWEEP_MARKER        Text that marks a module as passed
///     SIMSWEEP_OUTPUT_DIR    Directory that receives run directories
///     SIMSWEEP_JSON          Set to '1' for JSON output by default
///     RUST_LOG               Diagnostic log filter (e.g. 'simsweep=debug')
///     NO_COLOR               Set to disable colored output
#[derive(Parser)]
#[command(name = "simsweep")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sweep
    ///
    /// Compiles and executes every module for every configuration, then writes
    /// per-configuration reports, the dashboard and the latest-results alias.
    ///
    /// EXAMPLES:
    ///     simsweep run                                  Defaults (8,16 x 2,3,4 x 25)
    ///     simsweep run --widths 8 --pipe-stages 2 -m 3  One small configuration
    ///     simsweep run --json                           Print the result as JSON
    ///     simsweep run --strict                         Exit 1 when any module fails
    #[command(visible_alias = "r")]
    Run {
        /// Comma-separated width values (e.g. 8,16)
        #[arg(long, short = 'w', env = "SIMSWEEP_WIDTHS")]
        widths: Option<ValueList>,
        /// Comma-separated pipeline-depth values (e.g. 2,3,4)
        #[arg(long, short = 'p', env = "SIMSWEEP_PIPE_STAGES")]
        pipe_stages: Option<ValueList>,
        /// Modules per configuration
        #[arg(long, short = 'm', env = "SIMSWEEP_MODULES",
              value_parser = clap::value_parser!(u32).range(1..))]
        modules: Option<u32>,
        /// Path to a configuration file (default: search for simsweep.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
        /// Directory that receives the run directory
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,
        /// Compiler executable
        #[arg(long)]
        toolchain: Option<String>,
        /// Text whose presence in a module log marks it as passed
        #[arg(long)]
        marker: Option<String>,
        /// Do not create or update the latest-results alias
        #[arg(long)]
        no_alias: bool,
        /// Output the result in JSON format
        #[arg(long, env = "SIMSWEEP_JSON",
              value_parser = clap::builder::BoolishValueParser::new())]
        json: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
        /// Print every module result and diagnostic logging
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Exit with status 1 when any module did not pass
        #[arg(long)]
        strict: bool,
    },

    /// Print the most recent run directory
    ///
    /// Resolves the latest-results alias and prints the run directory it
    /// points at.
    ///
    /// EXAMPLES:
    ///     simsweep latest                       Print the path
    ///     simsweep latest --dashboard           Print the dashboard path
    ///     xdg-open "$(simsweep l --dashboard)"  Open the dashboard
    #[command(visible_alias = "l")]
    Latest {
        /// Alias to resolve (default: from configuration, else latest_results)
        #[arg(long)]
        alias: Option<PathBuf>,
        /// Print the dashboard file instead of the directory
        #[arg(long)]
        dashboard: bool,
    },

    /// Generate shell completion scripts
    ///
    /// EXAMPLES:
    ///     simsweep completions bash > ~/.local/share/bash-completion/completions/simsweep
    ///     simsweep completions zsh > ~/.zfunc/_simsweep
    ///     simsweep completions fish > ~/.config/fish/completions/simsweep.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();

    match cli.command {
        Commands::Run {
            widths,
            pipe_stages,
            modules,
            config,
            output_dir,
            toolchain,
            marker,
            no_alias,
            json,
            no_color,
            verbose,
            strict,
        } => {
            logging::init(verbose, &cli_config);
            let args = commands::run::RunArgs {
                widths,
                pipe_stages,
                modules,
                config,
                output_dir,
                toolchain,
                marker,
                no_alias,
                json,
                // Command-line flag overrides environment variable
                no_color: no_color || cli_config.no_color,
                verbose,
                strict,
            };
            commands::run::run(args)?;
        }
        Commands::Latest { alias, dashboard } => {
            logging::init(false, &cli_config);
            commands::latest::run(alias, dashboard)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_smoke() {
        let _cli = Cli::parse_from(["simsweep", "latest"]);
    }

    #[test]
    fn test_run_lists_parsed() {
        let cli = Cli::parse_from([
            "simsweep",
            "run",
            "--widths",
            "8, 32",
            "--pipe-stages",
            "1",
            "--modules",
            "4",
        ]);
        match cli.command {
            Commands::Run {
                widths,
                pipe_stages,
                modules,
                ..
            } => {
                assert_eq!(widths.unwrap().values(), &[8, 32]);
                assert_eq!(pipe_stages.unwrap().values(), &[1]);
                assert_eq!(modules, Some(4));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_rejects_non_numeric_width() {
        let result = Cli::try_parse_from(["simsweep", "run", "--widths", "8,x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_rejects_zero_modules() {
        let result = Cli::try_parse_from(["simsweep", "run", "--modules", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_rejects_empty_entry() {
        let result = Cli::try_parse_from(["simsweep", "run", "--pipe-stages", "2,,3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_strict_and_json_flags() {
        let cli = Cli::parse_from(["simsweep", "run", "--strict", "--json", "--no-alias"]);
        match cli.command {
            Commands::Run {
                strict,
                json,
                no_alias,
                ..
            } => {
                assert!(strict);
                assert!(json);
                assert!(no_alias);
            }
            _ => panic!("Expected Run command"),
        }
    }

    // Command alias tests
    #[test]
    fn test_alias_r_for_run() {
        let cli = Cli::parse_from(["simsweep", "r"]);
        assert!(matches!(cli.command, Commands::Run { .. }));
    }

    #[test]
    fn test_alias_l_for_latest() {
        let cli = Cli::parse_from(["simsweep", "l", "--dashboard"]);
        assert!(matches!(cli.command, Commands::Latest { dashboard: true, .. }));
    }

    #[test]
    fn test_completions_shell() {
        let cli = Cli::parse_from(["simsweep", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Bash }
        ));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
