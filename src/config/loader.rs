// src/config/loader.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::errors::{FolderNotifyError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "FOLDERNOTIFY_CONFIG";

/// Parse TOML text into a validated [`ConfigFile`].
///
/// Decode failures are reported as [`FolderNotifyError::ConfigDecode`]; the
/// caller decides whether that is fatal.
pub fn parse_config(contents: &str) -> Result<ConfigFile> {
    let raw: ConfigFile = toml::from_str(contents)
        .map_err(|err| FolderNotifyError::ConfigDecode(err.to_string()))?;
    Ok(validate_config(raw))
}

/// Reads and writes the folder list at a fixed location.
///
/// The store is the only place that touches the config file; the registry
/// calls [`ConfigStore::save`] after every mutating operation.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    /// Store backed by the real filesystem at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(RealFileSystem), path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, propagating read and decode errors.
    ///
    /// A missing file is not an error: it yields the default configuration.
    pub fn load(&self) -> Result<ConfigFile> {
        if !self.fs.exists(&self.path) {
            info!(path = ?self.path, "no configuration file yet; starting empty");
            return Ok(ConfigFile::default());
        }
        let contents = self.fs.read_to_string(&self.path)?;
        let cfg = parse_config(&contents)?;
        debug!(path = ?self.path, folders = cfg.folders.len(), "configuration loaded");
        Ok(cfg)
    }

    /// Load the configuration, falling back to an empty one on any failure.
    ///
    /// This is what startup uses: a corrupt file must not keep the process
    /// from running, it only costs the user their folder list.
    pub fn load_or_default(&self) -> ConfigFile {
        match self.load() {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(
                    path = ?self.path,
                    error = %err,
                    "configuration unreadable; continuing with no folders registered"
                );
                ConfigFile::default()
            }
        }
    }

    pub fn save(&self, cfg: &ConfigFile) -> Result<()> {
        let text = toml::to_string_pretty(cfg)?;
        self.fs.write(&self.path, text.as_bytes())?;
        debug!(path = ?self.path, folders = cfg.folders.len(), "configuration saved");
        Ok(())
    }
}

/// Resolve the config file location.
///
/// Priority:
/// 1. an explicit path (e.g. `--config`)
/// 2. the `FOLDERNOTIFY_CONFIG` environment variable
/// 3. `<user config dir>/foldernotify/folders.toml`
/// 4. `foldernotify.toml` in the current working directory
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }
    default_config_path()
}

pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("foldernotify").join("folders.toml"),
        None => PathBuf::from("foldernotify.toml"),
    }
}
