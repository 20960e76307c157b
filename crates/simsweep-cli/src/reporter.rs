//! Console reporter - live sweep progress and summaries

use colored::*;
use simsweep_core::{
    ConfigKey, ConfigurationResult, HarnessError, ModuleResult, ModuleStatus,
    SuiteResult, SweepObserver, SweepPlan,
};
use std::io::{self, Write};
use std::path::Path;

/// Prints sweep progress to stdout
pub struct ConsoleReporter {
    /// One line per module instead of a progress dot
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn status_label(status: ModuleStatus) -> ColoredString {
        match status {
            ModuleStatus::Passed => status.label().green().bold(),
            ModuleStatus::Failed => status.label().red().bold(),
            ModuleStatus::CompileFailed => status.label().yellow().bold(),
        }
    }

    fn progress_mark(status: ModuleStatus) -> ColoredString {
        match status {
            ModuleStatus::Passed => ".".green(),
            ModuleStatus::Failed => "F".red().bold(),
            ModuleStatus::CompileFailed => "C".yellow().bold(),
        }
    }
}

impl SweepObserver for ConsoleReporter {
    fn suite_started(&self, plan: &SweepPlan, run_root: &Path) {
        println!(
            "{} {} configuration{} x {} module{} ({} runs)",
            "Sweeping".bold(),
            plan.configuration_count().to_string().bold(),
            if plan.configuration_count() == 1 { "" } else { "s" },
            plan.modules().to_string().bold(),
            if plan.modules() == 1 { "" } else { "s" },
            plan.total_tests()
        );
        println!("Results: {}", run_root.display().to_string().dimmed());
    }

    fn configuration_started(&self, key: ConfigKey) {
        println!();
        println!("{} {}", "Configuration".cyan().bold(), key);
        if !self.verbose {
            print!("  ");
            let _ = io::stdout().flush();
        }
    }

    fn module_finished(&self, result: &ModuleResult) {
        if self.verbose {
            println!(
                "  Module {:<3} {} ({:.1}s) {}",
                result.module_id(),
                Self::status_label(result.status()),
                result.duration().as_secs_f64(),
                result.log_path().display().to_string().dimmed()
            );
        } else {
            print!("{}", Self::progress_mark(result.status()));
            let _ = io::stdout().flush();
        }
    }

    fn configuration_finished(&self, result: &ConfigurationResult) {
        if !self.verbose {
            println!();
        }
        println!();
        print!("{}", result.summary_table());
    }

    fn alias_failed(&self, alias: &Path, error: &HarnessError) {
        eprintln!(
            "{} could not update {}: {}",
            "warning:".yellow().bold(),
            alias.display(),
            error
        );
    }

    fn suite_finished(&self, result: &SuiteResult) {
        println!();
        println!("{}", "─".repeat(50));

        let status = if result.all_passed() {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };
        let failed = result.total_failed().to_string();

        println!(
            "Sweep result: {} | {} total, {} passed, {} failed",
            status,
            result.total_tests().to_string().bold(),
            result.total_passed().to_string().green().bold(),
            if result.total_failed() > 0 {
                failed.red().bold()
            } else {
                failed.normal()
            }
        );
        println!("Time: {:.1}s", result.total_duration().as_secs_f64());
        println!(
            "Dashboard: {}",
            result
                .run_root()
                .join(simsweep_core::layout::DASHBOARD_FILE)
                .display()
        );

        self.print_failures(result);
    }
}

impl ConsoleReporter {
    /// List the log of every module that did not pass
    fn print_failures(&self, result: &SuiteResult) {
        let failures: Vec<&ModuleResult> = result
            .configurations()
            .iter()
            .flat_map(|c| c.modules())
            .filter(|m| m.status().is_fail())
            .collect();

        if failures.is_empty() {
            return;
        }

        println!();
        println!("{}", "Failures:".red().bold());
        for module in failures {
            println!(
                "  {} {} module {} {}",
                "●".red(),
                module.key(),
                module.module_id(),
                Self::status_label(module.status())
            );
            println!("    {}", module.log_path().display().to_string().dimmed());
        }
    }
}
