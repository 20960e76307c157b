//! Static HTML reports
//!
//! Each configuration gets a `report.html` linking its module logs; the run
//! root gets a `dashboard.html` linking every configuration report and showing
//! the pass-rate heat map.

mod html;

pub use html::{render_configuration_report, render_dashboard};

use crate::error::{HarnessError, HarnessResult};
use crate::model::{ConfigurationResult, SuiteResult};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

/// Render and write a configuration report to `path`
pub fn write_configuration_report(
    result: &ConfigurationResult,
    path: &Path,
    generated_at: DateTime<Local>,
) -> HarnessResult<()> {
    let html = render_configuration_report(result, generated_at);
    fs::write(path, html).map_err(|e| HarnessError::io(path, e))
}

/// Render and write the suite dashboard to `path`
pub fn write_dashboard(
    result: &SuiteResult,
    path: &Path,
    generated_at: DateTime<Local>,
) -> HarnessResult<()> {
    let html = render_dashboard(result, generated_at);
    fs::write(path, html).map_err(|e| HarnessError::io(path, e))
}
