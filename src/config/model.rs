// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{FolderState, NotificationStyle};

/// Persisted configuration as read from / written to the TOML file.
///
/// ```toml
/// [settings]
/// coalesce_ms = 1000
/// style = "combined"
///
/// [[folder]]
/// path = "/home/me/Documents"
/// active = true
/// excluded_subpaths = ["/home/me/Documents/cache"]
/// ```
///
/// Every section is optional. The order of `[[folder]]` entries is the order
/// folders are listed and reconciled in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default, rename = "folder")]
    pub folders: Vec<FolderRecord>,
}

impl ConfigFile {
    pub fn record(&self, path: &Path) -> Option<&FolderRecord> {
        self.folders.iter().find(|r| r.path == path)
    }

    pub fn record_mut(&mut self, path: &Path) -> Option<&mut FolderRecord> {
        self.folders.iter_mut().find(|r| r.path == path)
    }
}

/// `[settings]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Length of the coalescing window in milliseconds.
    #[serde(default = "default_coalesce_ms")]
    pub coalesce_ms: u64,

    /// Upper bound on how long stopping a monitor may wait for it to exit.
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,

    #[serde(default)]
    pub style: NotificationStyle,

    /// Extra basename globs to ignore, on top of the built-in artifact list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
}

fn default_coalesce_ms() -> u64 {
    1000
}

fn default_stop_timeout_ms() -> u64 {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            coalesce_ms: default_coalesce_ms(),
            stop_timeout_ms: default_stop_timeout_ms(),
            style: NotificationStyle::default(),
            ignore: Vec::new(),
        }
    }
}

impl Settings {
    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

/// One `[[folder]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FolderRecord {
    pub path: PathBuf,

    /// Display name; defaults to the last path component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_subpaths: Vec<PathBuf>,
}

fn default_active() -> bool {
    true
}

impl FolderRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            active: true,
            excluded_subpaths: Vec::new(),
        }
    }

    pub fn desired_state(&self) -> FolderState {
        FolderState::from_active(self.active)
    }

    pub fn display_name(&self) -> String {
        display_name_for(&self.path, self.name.as_deref())
    }
}

/// Folder label used in notification titles and listings.
pub fn display_name_for(path: &Path, name: Option<&str>) -> String {
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        return name.to_string();
    }
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
