// src/engine/monitor.rs

//! One running monitor: a watch on a folder plus the task that filters its
//! events and drives its coalescing window.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, timeout, Instant};
use tracing::{debug, info, trace, warn};

use crate::engine::queue::QueueSender;
use crate::watch::filter::{EventFilter, FilterDecision};
use crate::watch::patterns::IgnorePatterns;
use crate::watch::source::{EventSource, EventStream};
use crate::watch::window::CoalescingWindow;

/// Everything needed to start a monitor for one folder.
#[derive(Debug, Clone)]
pub struct MonitorSpec {
    pub folder: PathBuf,
    pub name: String,
    pub excluded: Vec<PathBuf>,
    pub delay: Duration,
}

/// How a monitor ended when asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    /// The task did not finish within the bound and was aborted.
    TimedOut,
}

/// Handle to a running monitor, owned by its registry entry.
#[derive(Debug)]
pub struct MonitorHandle {
    folder: PathBuf,
    root: PathBuf,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Path actually being watched (canonical form of the folder).
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the window (dropping any pending batch), release the watch, and
    /// wait at most `bound` for the task to exit.
    pub async fn stop(mut self, bound: Duration) -> StopOutcome {
        if let Some(cancel) = self.cancel.take() {
            // Err means the task already exited on its own.
            let _ = cancel.send(());
        }

        match timeout(bound, &mut self.task).await {
            Ok(Ok(())) => StopOutcome::Stopped,
            Ok(Err(join_err)) => {
                warn!(folder = ?self.folder, error = %join_err, "monitor task ended abnormally");
                StopOutcome::Stopped
            }
            Err(_) => {
                self.task.abort();
                StopOutcome::TimedOut
            }
        }
    }
}

/// Start watching `spec.folder` and spawn its coalescing task.
///
/// Path resolution and watch registration run on the blocking pool; a
/// recursive watch over a large tree can take a while.
pub async fn spawn_monitor(
    spec: MonitorSpec,
    source: Arc<dyn EventSource>,
    ignores: Arc<IgnorePatterns>,
    queue: QueueSender,
) -> Result<MonitorHandle> {
    let folder = spec.folder.clone();
    let requested = spec.excluded.clone();
    let (root, excluded, stream) = tokio::task::spawn_blocking(move || -> Result<_> {
        // Canonicalize once so event paths and exclusions share a base.
        let root = folder.canonicalize().unwrap_or_else(|_| folder.clone());
        let excluded: Vec<PathBuf> = requested
            .iter()
            .map(|ex| rebase(ex, &folder, &root))
            .collect();
        let stream = source.watch(&root)?;
        Ok((root, excluded, stream))
    })
    .await
    .context("watch setup task failed")??;

    let filter = EventFilter::new(root.clone(), excluded, ignores);
    let window = CoalescingWindow::new(spec.folder.clone(), spec.name, root.clone(), spec.delay);
    let (cancel_tx, cancel_rx) = oneshot::channel();

    let task = tokio::spawn(run_monitor(stream, filter, window, queue, cancel_rx));

    info!(folder = ?spec.folder, root = ?root, "monitor started");
    Ok(MonitorHandle {
        folder: spec.folder,
        root,
        cancel: Some(cancel_tx),
        task,
    })
}

/// Map an exclusion written against `folder` onto the canonical `root`.
fn rebase(path: &Path, folder: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(folder) {
        Ok(rel) => root.join(rel),
        Err(_) => path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
    }
}

async fn run_monitor(
    mut stream: EventStream,
    filter: EventFilter,
    mut window: CoalescingWindow,
    queue: QueueSender,
    mut cancel: oneshot::Receiver<()>,
) {
    loop {
        let deadline = window.deadline();
        let timer = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        // Order matters: a stop request beats a due flush, and a due flush
        // beats new events so a busy folder cannot postpone its window.
        tokio::select! {
            biased;

            _ = &mut cancel => {
                let dropped = window.discard();
                debug!(folder = ?window.folder(), dropped, "monitor cancelled; pending batch discarded");
                break;
            }

            _ = timer => {
                if let Some(batch) = window.flush() {
                    debug!(folder = ?batch.folder, changes = batch.changes.len(), "window closed");
                    queue.push(batch);
                }
            }

            maybe = stream.recv() => match maybe {
                Some(event) => match filter.decide(&event) {
                    FilterDecision::Keep => {
                        trace!(?event, "event accepted");
                        window.accept(event, Instant::now());
                    }
                    FilterDecision::Discard(reason) => {
                        trace!(?event, ?reason, "event discarded");
                    }
                },
                None => {
                    // Not a stop request: whatever was pending is still news.
                    if let Some(batch) = window.flush() {
                        queue.push(batch);
                    }
                    warn!(folder = ?window.folder(), "event source closed; monitor exiting");
                    break;
                }
            },
        }
    }

    stream.unwatch();
    debug!(folder = ?window.folder(), "monitor task finished");
}
