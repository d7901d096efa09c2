// src/config/edit.rs

//! Offline edits of the folder list, used by the CLI when no watcher process
//! is involved. The rules match the live registry operations, including
//! comparing folder paths after folding `.` and `..`.

use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, FolderRecord};
use crate::errors::{FolderNotifyError, Result};
use crate::fs::normalize_path;

pub fn add_folder(cfg: &mut ConfigFile, path: &Path) -> Result<()> {
    let path = normalize_path(path);
    if cfg.record(&path).is_some() {
        return Err(FolderNotifyError::DuplicatePath(path));
    }
    cfg.folders.push(FolderRecord::new(path));
    Ok(())
}

pub fn remove_folder(cfg: &mut ConfigFile, path: &Path) -> Result<FolderRecord> {
    let path = normalize_path(path);
    let idx = cfg
        .folders
        .iter()
        .position(|r| r.path == path)
        .ok_or(FolderNotifyError::UnknownFolder(path))?;
    Ok(cfg.folders.remove(idx))
}

/// Set the desired state. Returns whether it changed.
pub fn set_active(cfg: &mut ConfigFile, path: &Path, active: bool) -> Result<bool> {
    let record = require(cfg, &normalize_path(path))?;
    let changed = record.active != active;
    record.active = active;
    Ok(changed)
}

/// Add (`exclude = true`) or remove an excluded subpath. Returns whether the
/// list changed.
pub fn set_excluded(cfg: &mut ConfigFile, path: &Path, sub: &Path, exclude: bool) -> Result<bool> {
    let path = normalize_path(path);
    let sub = resolve_subpath(&path, sub)?;
    let record = require(cfg, &path)?;

    if exclude {
        if record.excluded_subpaths.contains(&sub) {
            return Ok(false);
        }
        record.excluded_subpaths.push(sub);
        Ok(true)
    } else {
        let before = record.excluded_subpaths.len();
        record.excluded_subpaths.retain(|ex| ex != &sub);
        Ok(record.excluded_subpaths.len() != before)
    }
}

/// Resolve `sub` against `folder` and make sure it lies strictly below it
/// once `..` is folded.
pub fn resolve_subpath(folder: &Path, sub: &Path) -> Result<PathBuf> {
    let folder = normalize_path(folder);
    let sub = normalize_path(&folder.join(sub));
    if !sub.starts_with(&folder) || sub == folder {
        return Err(FolderNotifyError::ConfigError(format!(
            "{:?} is not below watched folder {:?}",
            sub, folder
        )));
    }
    Ok(sub)
}

fn require<'a>(cfg: &'a mut ConfigFile, path: &Path) -> Result<&'a mut FolderRecord> {
    cfg.record_mut(path)
        .ok_or_else(|| FolderNotifyError::UnknownFolder(path.to_path_buf()))
}
