//! HTML rendering for configuration reports and the sweep dashboard

use crate::layout::{CONFIG_REPORT_FILE, DASHBOARD_FILE};
use crate::model::{ConfigKey, ConfigurationResult, SuiteResult};
use chrono::{DateTime, Local};
use std::fmt::{self, Write};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BASE_STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; }
        table { border-collapse: collapse; width: 100%; margin-bottom: 20px; }
        th, td { padding: 8px; text-align: left; border: 1px solid #ddd; }
        th { background-color: #f2f2f2; }
        .summary-box { padding: 10px; margin-top: 20px; border-radius: 5px; text-align: center; font-weight: bold; }
        .success { background-color: #dff0d8; color: #3c763d; }
        .failure { background-color: #f2dede; color: #a94442; }
";

const CONFIG_STYLE: &str = "\
        tr.passed td:nth-child(2) { color: green; font-weight: bold; }
        tr.failed td:nth-child(2) { color: red; font-weight: bold; }
        tr.summary { font-weight: bold; background-color: #f2f2f2; }
";

const DASHBOARD_STYLE: &str = "\
        .dashboard-title { text-align: center; margin-bottom: 20px; }
        .summary { background-color: #f9f9f9; padding: 15px; margin-bottom: 20px; border-radius: 5px; }
        .passed { color: green; font-weight: bold; }
        .failed { color: red; font-weight: bold; }
        .highlight { background-color: #ffffd0; }
        td.heat { color: white; text-align: center; }
";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_head(out: &mut String, title: &str, extra_style: &str) -> fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>")?;
    writeln!(out, "<head>")?;
    writeln!(out, "    <meta charset=\"utf-8\">")?;
    writeln!(out, "    <title>{}</title>", escape(title))?;
    writeln!(out, "    <style>")?;
    out.push_str(BASE_STYLE);
    out.push_str(extra_style);
    writeln!(out, "    </style>")?;
    writeln!(out, "</head>")
}

fn write_summary_box(out: &mut String, failed: usize, total: usize) -> fmt::Result {
    if failed == 0 {
        writeln!(out, "    <div class=\"summary-box success\">ALL TESTS PASSED!</div>")
    } else {
        writeln!(
            out,
            "    <div class=\"summary-box failure\">SOME TESTS FAILED! ({} out of {})</div>",
            failed, total
        )
    }
}

/// Per-configuration report: one row per module with a link to its log
pub fn render_configuration_report(
    result: &ConfigurationResult,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_configuration_report(&mut out, result, generated_at);
    out
}

fn write_configuration_report(
    out: &mut String,
    result: &ConfigurationResult,
    generated_at: DateTime<Local>,
) -> fmt::Result {
    let title = format!("Test Report: {}", result.key());
    write_head(out, &title, CONFIG_STYLE)?;
    writeln!(out, "<body>")?;
    writeln!(out, "    <h1>{}</h1>", escape(&title))?;
    writeln!(
        out,
        "    <p><strong>Date:</strong> {}</p>",
        generated_at.format(DATE_FORMAT)
    )?;
    writeln!(out, "    <h2>Results</h2>")?;
    writeln!(out, "    <table>")?;
    writeln!(
        out,
        "        <tr><th>Module</th><th>Status</th><th>Time (sec)</th><th>Log File</th></tr>"
    )?;

    for module in result.modules() {
        let class = if module.status().is_pass() {
            "passed"
        } else {
            "failed"
        };
        writeln!(
            out,
            "        <tr class=\"{}\"><td>Module {}</td><td>{}</td><td>{:.1}</td><td><a href=\"{}\" target=\"_blank\">View Log</a></td></tr>",
            class,
            module.module_id(),
            module.status().label(),
            module.duration().as_secs_f64(),
            escape(&module.log_file_name())
        )?;
    }

    writeln!(
        out,
        "        <tr class=\"summary\"><td>TOTAL</td><td>{} passed, {} failed</td><td>{:.1}</td><td></td></tr>",
        result.passed_count(),
        result.failed_count(),
        result.duration().as_secs_f64()
    )?;
    writeln!(out, "    </table>")?;

    write_summary_box(out, result.failed_count(), result.total())?;

    writeln!(
        out,
        "    <p><a href=\"../{}\">Back to Dashboard</a></p>",
        DASHBOARD_FILE
    )?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

/// Suite dashboard: totals, one row per configuration run and the heat map
pub fn render_dashboard(result: &SuiteResult, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_dashboard(&mut out, result, generated_at);
    out
}

fn write_dashboard(
    out: &mut String,
    result: &SuiteResult,
    generated_at: DateTime<Local>,
) -> fmt::Result {
    let title = "Pipeline Arithmetic Module Test Dashboard";
    write_head(out, title, DASHBOARD_STYLE)?;
    writeln!(out, "<body>")?;
    writeln!(out, "    <h1 class=\"dashboard-title\">{}</h1>", title)?;

    let config_count = result.configurations().len();
    writeln!(out, "    <div class=\"summary\">")?;
    writeln!(out, "        <h2>Overall Summary</h2>")?;
    writeln!(
        out,
        "        <p><strong>Date:</strong> {}</p>",
        generated_at.format(DATE_FORMAT)
    )?;
    writeln!(
        out,
        "        <p><strong>Configurations Tested:</strong> {}</p>",
        config_count
    )?;
    writeln!(
        out,
        "        <p><strong>Modules per Configuration:</strong> {}</p>",
        result.modules_per_configuration()
    )?;
    writeln!(
        out,
        "        <p><strong>Total Tests:</strong> {}</p>",
        result.total_tests()
    )?;
    writeln!(
        out,
        "        <p><strong>Tests Passed:</strong> <span class=\"passed\">{}</span></p>",
        result.total_passed()
    )?;
    writeln!(
        out,
        "        <p><strong>Tests Failed:</strong> <span class=\"failed\">{}</span></p>",
        result.total_failed()
    )?;
    writeln!(
        out,
        "        <p><strong>Total Runtime:</strong> {:.1} seconds</p>",
        result.total_duration().as_secs_f64()
    )?;
    writeln!(out, "    </div>")?;

    writeln!(out, "    <h2>Configuration Results</h2>")?;
    writeln!(out, "    <table class=\"config-table\">")?;
    writeln!(
        out,
        "        <tr><th>Width</th><th>Pipeline Stages</th><th>Pass</th><th>Fail</th><th>Time (sec)</th><th>Actions</th></tr>"
    )?;
    for config in result.configurations() {
        let class = if config.all_passed() { "" } else { "highlight" };
        writeln!(
            out,
            "        <tr class=\"{}\"><td>{}</td><td>{}</td><td class=\"passed\">{}</td><td class=\"failed\">{}</td><td>{:.1}</td><td><a href=\"{}/{}\">View Details</a></td></tr>",
            class,
            config.width(),
            config.pipe_stages(),
            config.passed_count(),
            config.failed_count(),
            config.duration().as_secs_f64(),
            config.key().dir_name(),
            CONFIG_REPORT_FILE
        )?;
    }
    writeln!(out, "    </table>")?;

    writeln!(out, "    <h2>Heat Map: Pass Rate by Configuration</h2>")?;
    writeln!(out, "    <table class=\"config-table heat-map\">")?;
    write!(out, "        <tr><th>Width / Pipeline Stages</th>")?;
    for depth in result.pipe_stages() {
        write!(out, "<th>{}</th>", depth)?;
    }
    writeln!(out, "</tr>")?;

    for &width in result.widths() {
        write!(out, "        <tr><td>{}</td>", width)?;
        for &depth in result.pipe_stages() {
            let rate = result.pass_rate(ConfigKey::new(width, depth));
            match rate.heat_color() {
                Some((r, g, b)) => write!(
                    out,
                    "<td class=\"heat\" style=\"background-color: rgb({}, {}, {});\">{}</td>",
                    r, g, b, rate
                )?,
                None => write!(out, "<td>{}</td>", rate)?,
            }
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "    </table>")?;

    write_summary_box(out, result.total_failed(), result.total_tests())?;

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}
