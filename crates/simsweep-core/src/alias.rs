//! Latest-results alias
//!
//! On unix the alias is a symbolic link to the most recent run root. Elsewhere
//! it is a pointer file whose content is the run root path. [`resolve_latest`]
//! understands both forms.

use crate::error::{HarnessError, HarnessResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default alias name, created in the working directory
pub const LATEST_ALIAS: &str = "latest_results";

/// Point `alias` at `run_root`, replacing any previous alias
///
/// An existing real directory at `alias` is never removed.
pub fn update_latest(alias: &Path, run_root: &Path) -> HarnessResult<()> {
    if let Ok(meta) = fs::symlink_metadata(alias) {
        if meta.is_dir() {
            return Err(HarnessError::alias(
                alias,
                "a directory with that name already exists",
            ));
        }
    }

    let target = link_target(alias, run_root);
    let staging = staging_path(alias);
    remove_if_present(&staging)?;

    write_alias(&staging, &target).map_err(|e| HarnessError::alias(alias, e))?;
    fs::rename(&staging, alias).map_err(|e| {
        let _ = fs::remove_file(&staging);
        HarnessError::alias(alias, e)
    })?;

    debug!("{} -> {}", alias.display(), target.display());
    Ok(())
}

/// The run root `alias` currently points at
pub fn resolve_latest(alias: &Path) -> HarnessResult<PathBuf> {
    let meta = match fs::symlink_metadata(alias) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(HarnessError::NoLatestRun(alias.to_path_buf()));
        }
        Err(e) => return Err(HarnessError::io(alias, e)),
    };

    let target = if meta.file_type().is_symlink() {
        fs::read_link(alias).map_err(|e| HarnessError::io(alias, e))?
    } else if meta.is_file() {
        let content = fs::read_to_string(alias).map_err(|e| HarnessError::io(alias, e))?;
        PathBuf::from(content.trim())
    } else {
        return Err(HarnessError::NoLatestRun(alias.to_path_buf()));
    };

    if target.is_relative() {
        Ok(alias_dir(alias).join(target))
    } else {
        Ok(target)
    }
}

fn alias_dir(alias: &Path) -> &Path {
    match alias.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Relative target when the run root sits beside the alias, absolute otherwise
fn link_target(alias: &Path, run_root: &Path) -> PathBuf {
    let alias_parent = fs::canonicalize(alias_dir(alias)).ok();
    let root = fs::canonicalize(run_root).unwrap_or_else(|_| run_root.to_path_buf());

    match (alias_parent, root.parent(), root.file_name()) {
        (Some(alias_parent), Some(root_parent), Some(name)) if alias_parent == root_parent => {
            PathBuf::from(name)
        }
        _ => root,
    }
}

fn staging_path(alias: &Path) -> PathBuf {
    let name = alias
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| LATEST_ALIAS.to_string());
    alias_dir(alias).join(format!(".{}.tmp", name))
}

fn remove_if_present(path: &Path) -> HarnessResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(HarnessError::io(path, e)),
    }
}

#[cfg(unix)]
fn write_alias(path: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, path)
}

#[cfg(not(unix))]
fn write_alias(path: &Path, target: &Path) -> io::Result<()> {
    fs::write(path, target.display().to_string())
}
