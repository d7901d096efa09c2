// src/engine/registry.rs

//! The watcher registry: the authoritative list of configured folders.
//!
//! Every public operation takes the registry lock for its whole duration, so
//! two commands for the same folder can never interleave (a `stop` cannot
//! race a `start`). Monitor handles live only inside registry entries.
//!
//! Folders are keyed by their absolute path with `.` and `..` folded, so
//! `/data/x/../docs` and `/data/docs` are the same folder. Watch setup and
//! config writes run on the blocking pool.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::config::edit::resolve_subpath;
use crate::config::loader::ConfigStore;
use crate::config::model::{display_name_for, ConfigFile, FolderRecord, Settings};
use crate::engine::monitor::{spawn_monitor, MonitorHandle, MonitorSpec, StopOutcome};
use crate::engine::queue::QueueSender;
use crate::errors::{FolderNotifyError, Result};
use crate::fs::{absolute_path, normalize_path, FileSystem, RealFileSystem};
use crate::types::FolderState;
use crate::watch::patterns::IgnorePatterns;
use crate::watch::source::{EventSource, NotifyEventSource};

/// Snapshot of one folder, as shown to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderInfo {
    pub path: PathBuf,
    pub name: String,
    pub state: FolderState,
    pub excluded_subpaths: Vec<PathBuf>,
    /// Whether a monitor task is currently alive for this folder.
    pub monitoring: bool,
}

/// Outcome of [`WatcherRegistry::reconcile`].
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub started: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, FolderNotifyError)>,
}

#[derive(Debug)]
struct WatchedFolder {
    path: PathBuf,
    name: Option<String>,
    desired: FolderState,
    excluded: Vec<PathBuf>,
    monitor: Option<MonitorHandle>,
}

impl WatchedFolder {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            name: None,
            desired: FolderState::Active,
            excluded: Vec::new(),
            monitor: None,
        }
    }

    /// Entry for a persisted record. Starts out inactive; reconciliation
    /// decides whether it becomes active.
    fn from_record(record: &FolderRecord) -> Self {
        Self {
            path: record.path.clone(),
            name: record.name.clone(),
            desired: FolderState::Inactive,
            excluded: record.excluded_subpaths.clone(),
            monitor: None,
        }
    }

    fn has_live_monitor(&self) -> bool {
        self.monitor.as_ref().is_some_and(MonitorHandle::is_running)
    }

    fn record(&self) -> FolderRecord {
        FolderRecord {
            path: self.path.clone(),
            name: self.name.clone(),
            active: self.desired.is_active(),
            excluded_subpaths: self.excluded.clone(),
        }
    }

    fn info(&self) -> FolderInfo {
        FolderInfo {
            path: self.path.clone(),
            name: display_name_for(&self.path, self.name.as_deref()),
            state: self.desired,
            excluded_subpaths: self.excluded.clone(),
            monitoring: self.has_live_monitor(),
        }
    }
}

#[derive(Debug)]
struct RegistryState {
    folders: Vec<WatchedFolder>,
    /// Taken on shutdown; `None` means the registry is closed.
    queue: Option<QueueSender>,
}

impl RegistryState {
    fn index_of(&self, path: &Path) -> Option<usize> {
        self.folders.iter().position(|f| f.path == path)
    }

    fn require(&self, path: &Path) -> Result<usize> {
        self.index_of(path)
            .ok_or_else(|| FolderNotifyError::UnknownFolder(path.to_path_buf()))
    }
}

pub struct WatcherRegistry {
    state: Mutex<RegistryState>,
    store: ConfigStore,
    source: Arc<dyn EventSource>,
    fs: Arc<dyn FileSystem>,
    settings: Settings,
    window: Duration,
    ignores: Arc<IgnorePatterns>,
}

impl fmt::Debug for WatcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherRegistry")
            .field("store", &self.store)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for [`WatcherRegistry`].
///
/// Only the config store and the delivery queue are required. The event
/// source defaults to the platform watcher and the filesystem to `std::fs`.
pub struct RegistryBuilder {
    store: ConfigStore,
    queue: QueueSender,
    source: Option<Arc<dyn EventSource>>,
    fs: Option<Arc<dyn FileSystem>>,
    settings: Settings,
    window: Option<Duration>,
}

impl RegistryBuilder {
    pub fn source(mut self, source: impl EventSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn fs(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Some(Arc::new(fs));
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Use `window` instead of `settings.coalesce_ms` for this process only.
    /// The persisted settings are left untouched.
    pub fn coalesce_window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }

    pub fn build(self) -> Result<WatcherRegistry> {
        let ignores = IgnorePatterns::with_extra(&self.settings.ignore)?;
        Ok(WatcherRegistry {
            state: Mutex::new(RegistryState {
                folders: Vec::new(),
                queue: Some(self.queue),
            }),
            store: self.store,
            source: self.source.unwrap_or_else(|| Arc::new(NotifyEventSource)),
            fs: self.fs.unwrap_or_else(|| Arc::new(RealFileSystem)),
            window: self.window.unwrap_or_else(|| self.settings.coalesce_window()),
            settings: self.settings,
            ignores: Arc::new(ignores),
        })
    }
}

impl WatcherRegistry {
    pub fn builder(store: ConfigStore, queue: QueueSender) -> RegistryBuilder {
        RegistryBuilder {
            store,
            queue,
            source: None,
            fs: None,
            settings: Settings::default(),
            window: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register a new folder as active, start its monitor and persist.
    ///
    /// If the monitor cannot start, the folder stays registered (inactive)
    /// and `MonitorStartFailed` is returned.
    pub async fn add_folder(&self, path: impl AsRef<Path>) -> Result<FolderInfo> {
        let path = absolute(path.as_ref())?;
        let mut state = self.lock_open().await?;

        if state.index_of(&path).is_some() {
            return Err(FolderNotifyError::DuplicatePath(path));
        }

        state.folders.push(WatchedFolder::new(path.clone()));
        let idx = state.folders.len() - 1;
        info!(folder = ?path, "folder added");

        let started = self.start_entry(&mut state, idx).await;
        self.persist(&state).await?;
        started?;

        Ok(state.folders[idx].info())
    }

    /// Start monitoring a registered folder. No-op if it is already running.
    pub async fn start_folder(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = absolute(path.as_ref())?;
        let mut state = self.lock_open().await?;
        let idx = state.require(&path)?;

        if state.folders[idx].has_live_monitor() {
            debug!(folder = ?path, "start requested but monitor already running");
            return Ok(());
        }

        self.start_entry(&mut state, idx).await?;
        self.persist(&state).await
    }

    /// Stop monitoring a registered folder. No-op if it is already inactive.
    pub async fn stop_folder(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = absolute(path.as_ref())?;
        let mut state = self.lock_open().await?;
        let idx = state.require(&path)?;

        let entry = &mut state.folders[idx];
        if entry.monitor.is_none() && !entry.desired.is_active() {
            debug!(folder = ?path, "stop requested but folder already inactive");
            return Ok(());
        }

        self.halt_monitor(entry).await;
        entry.desired = FolderState::Inactive;
        info!(folder = ?path, "folder stopped");
        self.persist(&state).await
    }

    /// Stop (if needed) and unregister a folder, then persist.
    pub async fn remove_folder(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = absolute(path.as_ref())?;
        let mut state = self.lock_open().await?;
        let idx = state.require(&path)?;

        let mut entry = state.folders.remove(idx);
        self.halt_monitor(&mut entry).await;
        info!(folder = ?path, "folder removed");
        self.persist(&state).await
    }

    /// Suppress events below `sub` for a folder.
    ///
    /// A relative `sub` is taken relative to the folder. A running monitor is
    /// restarted so the new exclusion applies immediately; its pending batch
    /// is dropped. Returns whether anything changed.
    pub async fn exclude_subpath(&self, path: impl AsRef<Path>, sub: impl AsRef<Path>) -> Result<bool> {
        self.edit_exclusions(path.as_ref(), sub.as_ref(), true).await
    }

    /// Undo [`exclude_subpath`](Self::exclude_subpath).
    pub async fn include_subpath(&self, path: impl AsRef<Path>, sub: impl AsRef<Path>) -> Result<bool> {
        self.edit_exclusions(path.as_ref(), sub.as_ref(), false).await
    }

    /// Folders in registration order.
    pub async fn list_folders(&self) -> Vec<FolderInfo> {
        let state = self.state.lock().await;
        state.folders.iter().map(WatchedFolder::info).collect()
    }

    pub async fn folder(&self, path: impl AsRef<Path>) -> Option<FolderInfo> {
        let path = absolute(path.as_ref()).ok()?;
        let state = self.state.lock().await;
        state.index_of(&path).map(|idx| state.folders[idx].info())
    }

    /// Bring live state in line with persisted records.
    ///
    /// Unknown records are registered; every record marked active gets a
    /// start attempt. A failure is logged and reported per folder and never
    /// stops the remaining folders from being reconciled.
    pub async fn reconcile(&self, records: &[FolderRecord]) -> Result<ReconcileReport> {
        let mut state = self.lock_open().await?;
        let mut report = ReconcileReport::default();

        for record in records {
            let path = normalize_path(&record.path);
            let idx = match state.index_of(&path) {
                Some(idx) => idx,
                None => {
                    let mut entry = WatchedFolder::from_record(record);
                    entry.path = path.clone();
                    state.folders.push(entry);
                    state.folders.len() - 1
                }
            };

            if !record.active {
                continue;
            }
            if state.folders[idx].has_live_monitor() {
                report.started.push(path);
                continue;
            }

            match self.start_entry(&mut state, idx).await {
                Ok(()) => report.started.push(path),
                Err(err) => {
                    warn!(folder = ?path, error = %err, "could not start folder during reconciliation");
                    report.failed.push((path, err));
                }
            }
        }

        info!(
            started = report.started.len(),
            failed = report.failed.len(),
            "reconciliation finished"
        );
        Ok(report)
    }

    /// Stop every monitor, persist the final configuration, and close the
    /// delivery queue so the dispatcher can drain and exit.
    ///
    /// Desired states are kept as they are: a folder that was active when the
    /// process exits is started again by the next reconciliation. Calling
    /// this twice is harmless.
    pub async fn shutdown(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.queue.is_none() {
            return Ok(());
        }

        for entry in state.folders.iter_mut() {
            self.halt_monitor(entry).await;
        }

        let saved = self.persist(&state).await;
        state.queue = None;
        info!("registry shut down");
        saved
    }

    async fn lock_open(&self) -> Result<MutexGuard<'_, RegistryState>> {
        let state = self.state.lock().await;
        if state.queue.is_none() {
            return Err(FolderNotifyError::RegistryClosed);
        }
        Ok(state)
    }

    /// Start the monitor of entry `idx` and record the outcome in its desired
    /// state.
    async fn start_entry(&self, state: &mut RegistryState, idx: usize) -> Result<()> {
        let queue = state.queue.clone().ok_or(FolderNotifyError::RegistryClosed)?;
        let entry = &mut state.folders[idx];

        // A monitor whose source went away is finished but still parked here.
        entry.monitor = None;

        let fs = Arc::clone(&self.fs);
        let folder = entry.path.clone();
        let is_dir = tokio::task::spawn_blocking(move || fs.is_dir(&folder))
            .await
            .unwrap_or(false);
        if !is_dir {
            entry.desired = FolderState::Inactive;
            return Err(FolderNotifyError::MonitorStartFailed {
                path: entry.path.clone(),
                reason: "folder does not exist or is not a directory".to_string(),
            });
        }

        let spec = MonitorSpec {
            folder: entry.path.clone(),
            name: display_name_for(&entry.path, entry.name.as_deref()),
            excluded: entry.excluded.clone(),
            delay: self.window,
        };

        let source = Arc::clone(&self.source);
        match spawn_monitor(spec, source, Arc::clone(&self.ignores), queue).await {
            Ok(handle) => {
                entry.monitor = Some(handle);
                entry.desired = FolderState::Active;
                Ok(())
            }
            Err(err) => {
                entry.desired = FolderState::Inactive;
                Err(FolderNotifyError::MonitorStartFailed {
                    path: entry.path.clone(),
                    reason: format!("{err:#}"),
                })
            }
        }
    }

    /// Stop and join the entry's monitor, if any, without touching its
    /// desired state.
    async fn halt_monitor(&self, entry: &mut WatchedFolder) {
        let Some(handle) = entry.monitor.take() else {
            return;
        };
        let bound = self.settings.stop_timeout();
        match handle.stop(bound).await {
            StopOutcome::Stopped => debug!(folder = ?entry.path, "monitor stopped"),
            StopOutcome::TimedOut => {
                let err = FolderNotifyError::MonitorStopTimeout {
                    path: entry.path.clone(),
                    timeout: bound,
                };
                warn!(error = %err, "monitor abandoned");
            }
        }
    }

    async fn edit_exclusions(&self, path: &Path, sub: &Path, exclude: bool) -> Result<bool> {
        let path = absolute(path)?;
        let mut state = self.lock_open().await?;
        let idx = state.require(&path)?;

        let sub = resolve_subpath(&path, sub)?;

        let entry = &mut state.folders[idx];
        let changed = if exclude {
            if entry.excluded.contains(&sub) {
                false
            } else {
                entry.excluded.push(sub);
                true
            }
        } else {
            let before = entry.excluded.len();
            entry.excluded.retain(|ex| ex != &sub);
            entry.excluded.len() != before
        };

        if !changed {
            return Ok(false);
        }

        if entry.has_live_monitor() {
            self.halt_monitor(entry).await;
            self.start_entry(&mut state, idx).await?;
        }
        self.persist(&state).await?;
        Ok(true)
    }

    async fn persist(&self, state: &RegistryState) -> Result<()> {
        let cfg = ConfigFile {
            settings: self.settings.clone(),
            folders: state.folders.iter().map(WatchedFolder::record).collect(),
        };
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.save(&cfg))
            .await
            .map_err(anyhow::Error::from)?
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(absolute_path(path)?)
}
