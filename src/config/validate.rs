// src/config/validate.rs

//! Post-decode sanity checks.
//!
//! Validation here never rejects a whole file: a bad entry is repaired or
//! dropped with a warning so the remaining folders keep working.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::warn;

use crate::config::model::{ConfigFile, FolderRecord, Settings};
use crate::fs::normalize_path;
use crate::watch::patterns::compile_glob;

/// Repair `cfg` in place and return it.
pub fn validate_config(mut cfg: ConfigFile) -> ConfigFile {
    validate_settings(&mut cfg.settings);
    cfg.folders = validate_folders(std::mem::take(&mut cfg.folders));
    cfg
}

fn validate_settings(settings: &mut Settings) {
    if settings.coalesce_ms == 0 {
        warn!("[settings].coalesce_ms must be >= 1 (got 0); using 1");
        settings.coalesce_ms = 1;
    }
    if settings.stop_timeout_ms == 0 {
        warn!("[settings].stop_timeout_ms must be >= 1 (got 0); using 1");
        settings.stop_timeout_ms = 1;
    }

    settings.ignore.retain(|pattern| match compile_glob(pattern) {
        Ok(_) => true,
        Err(err) => {
            warn!(pattern = %pattern, error = %err, "dropping invalid ignore pattern");
            false
        }
    });
}

fn validate_folders(records: Vec<FolderRecord>) -> Vec<FolderRecord> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for mut record in records {
        record.path = normalize_path(&record.path);
        if !record.path.is_absolute() {
            warn!(path = ?record.path, "dropping folder with relative path");
            continue;
        }
        if !seen.insert(record.path.clone()) {
            warn!(path = ?record.path, "dropping duplicate folder entry");
            continue;
        }

        record.excluded_subpaths = record
            .excluded_subpaths
            .into_iter()
            .map(|sub| normalize_path(&record.path.join(sub)))
            .collect();
        let mut subs = HashSet::new();
        record.excluded_subpaths.retain(|sub| subs.insert(sub.clone()));

        out.push(record);
    }

    out
}
