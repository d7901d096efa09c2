// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolderNotifyError {
    #[error("Folder is already registered: {0:?}")]
    DuplicatePath(PathBuf),

    #[error("Folder is not registered: {0:?}")]
    UnknownFolder(PathBuf),

    #[error("Failed to start monitor for {path:?}: {reason}")]
    MonitorStartFailed { path: PathBuf, reason: String },

    #[error("Monitor for {path:?} did not stop within {timeout:?}")]
    MonitorStopTimeout { path: PathBuf, timeout: Duration },

    #[error("Registry has been shut down")]
    RegistryClosed,

    #[error("Could not decode configuration: {0}")]
    ConfigDecode(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FolderNotifyError>;
