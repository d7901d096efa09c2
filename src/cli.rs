// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::NotificationStyle;

/// Command-line arguments for `foldernotify`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "foldernotify",
    version,
    about = "Watch folders and get one readable notification per burst of changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the folder list (TOML).
    ///
    /// Default: `FOLDERNOTIFY_CONFIG`, else `<config dir>/foldernotify/folders.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FOLDERNOTIFY_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start every active folder and print notifications until Ctrl-C.
    Run {
        /// Override `[settings].coalesce_ms`.
        #[arg(long, value_name = "MS")]
        coalesce_ms: Option<u64>,

        /// Override `[settings].style` ("combined" or "per_file").
        #[arg(long, value_name = "STYLE", value_parser = parse_style)]
        style: Option<NotificationStyle>,

        /// Print the effective configuration and exit without watching.
        #[arg(long)]
        dry_run: bool,
    },
    /// List registered folders and their desired state.
    List,
    /// Register a folder (active).
    Add { path: PathBuf },
    /// Unregister a folder.
    Remove { path: PathBuf },
    /// Mark a registered folder active.
    Enable { path: PathBuf },
    /// Mark a registered folder inactive.
    Disable { path: PathBuf },
    /// Suppress events below SUBPATH (relative paths are taken from PATH).
    Exclude { path: PathBuf, subpath: PathBuf },
    /// Stop suppressing events below SUBPATH.
    Include { path: PathBuf, subpath: PathBuf },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn parse_style(s: &str) -> Result<NotificationStyle, String> {
    s.parse()
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
