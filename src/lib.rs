// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod present;
pub mod types;
pub mod watch;

use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, Command};
use crate::config::edit;
use crate::config::{resolve_config_path, ConfigFile, ConfigStore, FolderRecord, Settings};
use crate::engine::{delivery_queue, DispatchStats, Dispatcher, WatcherRegistry};
use crate::present::LogSurface;
use crate::types::NotificationStyle;

/// High-level entry point used by `main.rs`.
///
/// `run` (the default command) wires together:
/// - config loading
/// - delivery queue + dispatcher
/// - registry + reconciliation
/// - Ctrl-C handling and shutdown
///
/// Every other command edits the config file and exits.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = resolve_config_path(args.config.as_deref());
    let store = ConfigStore::at(&config_path);
    debug!(path = ?config_path, "using configuration file");

    let command = args.command.unwrap_or(Command::Run {
        coalesce_ms: None,
        style: None,
        dry_run: false,
    });

    match command {
        Command::Run {
            coalesce_ms,
            style,
            dry_run,
        } => {
            let cfg = store.load_or_default();
            let session = SessionOptions::new(&cfg.settings, coalesce_ms, style);
            if dry_run {
                print_dry_run(store.path(), &cfg, &session);
                return Ok(());
            }
            watch_until_interrupted(store, cfg, session).await
        }
        Command::List => {
            let cfg = store.load()?;
            print_folders(&cfg);
            Ok(())
        }
        Command::Add { path } => edit_config(&store, |cfg| {
            let path = absolute(&path)?;
            if !path.is_dir() {
                warn!(folder = ?path, "folder does not exist yet; it will fail to start until it does");
            }
            edit::add_folder(cfg, &path)?;
            println!("added {}", path.display());
            Ok(())
        }),
        Command::Remove { path } => edit_config(&store, |cfg| {
            let removed = edit::remove_folder(cfg, &absolute(&path)?)?;
            println!("removed {}", removed.path.display());
            Ok(())
        }),
        Command::Enable { path } => edit_config(&store, |cfg| {
            edit::set_active(cfg, &absolute(&path)?, true)?;
            Ok(())
        }),
        Command::Disable { path } => edit_config(&store, |cfg| {
            edit::set_active(cfg, &absolute(&path)?, false)?;
            Ok(())
        }),
        Command::Exclude { path, subpath } => edit_config(&store, |cfg| {
            edit::set_excluded(cfg, &absolute(&path)?, &subpath, true)?;
            Ok(())
        }),
        Command::Include { path, subpath } => edit_config(&store, |cfg| {
            edit::set_excluded(cfg, &absolute(&path)?, &subpath, false)?;
            Ok(())
        }),
    }
}

/// Load, reconcile, and dispatch notifications until Ctrl-C.
async fn watch_until_interrupted(
    store: ConfigStore,
    cfg: ConfigFile,
    session: SessionOptions,
) -> Result<()> {
    let (queue_tx, queue_rx) = delivery_queue();

    let dispatcher = Dispatcher::new(queue_rx, Arc::new(LogSurface), session.style).spawn();

    let registry = WatcherRegistry::builder(store, queue_tx)
        .settings(cfg.settings.clone())
        .coalesce_window(session.window)
        .build()?;

    serve_until(registry, &cfg.folders, dispatcher, tokio::signal::ctrl_c()).await?;
    Ok(())
}

/// Reconcile `folders`, then keep watching until `signal` resolves.
///
/// The registry is shut down and the dispatcher drained however `signal`
/// resolves; an error from it is returned only after that.
pub async fn serve_until(
    registry: WatcherRegistry,
    folders: &[FolderRecord],
    dispatcher: JoinHandle<DispatchStats>,
    signal: impl Future<Output = io::Result<()>>,
) -> Result<DispatchStats> {
    let report = registry.reconcile(folders).await?;
    for (path, err) in &report.failed {
        eprintln!("foldernotify: not watching {}: {err}", path.display());
    }
    info!(
        watching = report.started.len(),
        registered = folders.len(),
        "foldernotify running; press Ctrl+C to stop"
    );

    let interrupted = signal.await;
    match &interrupted {
        Ok(()) => info!("shutdown requested"),
        Err(err) => warn!(error = %err, "lost the shutdown signal; shutting down"),
    }

    let closed = registry.shutdown().await;
    drop(registry);

    let stats = dispatcher.await.context("dispatcher task failed")?;
    debug!(?stats, "dispatcher drained");

    interrupted.context("listening for Ctrl+C")?;
    closed?;
    Ok(stats)
}

/// `run` flags layered over `[settings]`. Never written back to the file.
#[derive(Debug, Clone, Copy)]
struct SessionOptions {
    window: Duration,
    style: NotificationStyle,
}

impl SessionOptions {
    fn new(settings: &Settings, coalesce_ms: Option<u64>, style: Option<NotificationStyle>) -> Self {
        Self {
            window: coalesce_ms
                .map(|ms| Duration::from_millis(ms.max(1)))
                .unwrap_or_else(|| settings.coalesce_window()),
            style: style.unwrap_or(settings.style),
        }
    }
}

/// Load (strictly: a corrupt file is an error here, not an empty list),
/// apply `f`, save.
fn edit_config(store: &ConfigStore, f: impl FnOnce(&mut ConfigFile) -> Result<()>) -> Result<()> {
    let mut cfg = store.load()?;
    f(&mut cfg)?;
    store.save(&cfg)?;
    Ok(())
}

fn absolute(path: &Path) -> Result<std::path::PathBuf> {
    crate::fs::absolute_path(path).with_context(|| format!("resolving {:?}", path))
}

fn print_folders(cfg: &ConfigFile) {
    if cfg.folders.is_empty() {
        println!("no folders registered");
        return;
    }
    for record in &cfg.folders {
        println!(
            "{:<8} {} ({})",
            record.desired_state(),
            record.path.display(),
            record.display_name()
        );
        for ex in &record.excluded_subpaths {
            println!("         excluding {}", ex.display());
        }
    }
}

/// Simple dry-run output: print settings and folders.
fn print_dry_run(path: &Path, cfg: &ConfigFile, session: &SessionOptions) {
    println!("foldernotify dry-run");
    println!("  config file = {}", path.display());
    println!("  coalesce window = {:?}", session.window);
    println!("  settings.stop_timeout_ms = {}", cfg.settings.stop_timeout_ms);
    println!("  style = {:?}", session.style);
    if !cfg.settings.ignore.is_empty() {
        println!("  settings.ignore = {:?}", cfg.settings.ignore);
    }
    println!();
    println!("folders ({}):", cfg.folders.len());
    print_folders(cfg);

    debug!("dry-run complete (nothing watched)");
}
