// src/config/mod.rs

//! Persisted folder configuration.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Read and write the config file at its user-scoped location (`loader.rs`).
//! - Repair invalid entries after decoding (`validate.rs`).
//! - Edit the folder list offline (`edit.rs`).

pub mod edit;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, parse_config, resolve_config_path, ConfigStore};
pub use model::{display_name_for, ConfigFile, FolderRecord, Settings};
pub use validate::validate_config;
