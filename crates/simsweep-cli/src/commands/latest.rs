//! Latest command - locate the most recent run

use super::run::load_settings;
use anyhow::Result;
use simsweep_core::layout::DASHBOARD_FILE;
use simsweep_core::{resolve_latest, LATEST_ALIAS};
use std::path::PathBuf;

/// Print the run root (or its dashboard) the latest-results alias points at
pub fn run(alias: Option<PathBuf>, dashboard: bool) -> Result<()> {
    let alias = match alias {
        Some(alias) => alias,
        None => load_settings(None)?
            .latest_alias
            .unwrap_or_else(|| PathBuf::from(LATEST_ALIAS)),
    };

    let run_root = resolve_latest(&alias)?;
    let target = if dashboard {
        run_root.join(DASHBOARD_FILE)
    } else {
        run_root
    };

    println!("{}", target.display());
    Ok(())
}
