// src/watch/manual.rs

//! Event source driven by hand, for tests and embedding shells that already
//! have their own change feed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;

use crate::watch::event::RawEvent;
use crate::watch::source::{EventSource, EventStream};

#[derive(Debug)]
struct Subscriber {
    id: u64,
    root: PathBuf,
    tx: mpsc::UnboundedSender<RawEvent>,
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    watch_calls: usize,
    failing: HashSet<PathBuf>,
}

/// An [`EventSource`] whose events come from [`ManualEventSource::emit`].
///
/// Cloning shares state, so a test keeps one handle while the registry owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct ManualEventSource {
    state: Arc<Mutex<ManualState>>,
}

/// Keeps a manual subscription registered until dropped.
struct ManualGuard {
    id: u64,
    state: Arc<Mutex<ManualState>>,
}

impl Drop for ManualGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.subscribers.retain(|s| s.id != self.id);
    }
}

impl ManualEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every live watch whose root contains it.
    ///
    /// Returns how many watches received the event.
    pub fn emit(&self, event: RawEvent) -> usize {
        let state = self.lock();
        state
            .subscribers
            .iter()
            .filter(|s| event.source_path.starts_with(&s.root))
            .filter(|s| s.tx.send(event.clone()).is_ok())
            .count()
    }

    /// Number of live watches on exactly `root`.
    pub fn active_watches(&self, root: &Path) -> usize {
        let state = self.lock();
        state.subscribers.iter().filter(|s| s.root == root).count()
    }

    /// Total number of successful `watch` calls so far.
    pub fn watch_calls(&self) -> usize {
        self.lock().watch_calls
    }

    /// Make every future `watch` of `root` fail.
    pub fn fail_on(&self, root: impl Into<PathBuf>) {
        self.lock().failing.insert(root.into());
    }

    /// Close every live watch on `root` as if the platform watcher died.
    pub fn disconnect(&self, root: &Path) {
        self.lock().subscribers.retain(|s| s.root != root);
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSource for ManualEventSource {
    fn watch(&self, path: &Path) -> Result<EventStream> {
        let mut state = self.lock();
        if state.failing.contains(path) {
            return Err(anyhow!("watch refused for {:?}", path));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let id = state.next_id;
        state.next_id += 1;
        state.watch_calls += 1;
        state.subscribers.push(Subscriber {
            id,
            root: path.to_path_buf(),
            tx,
        });

        let guard = ManualGuard {
            id,
            state: Arc::clone(&self.state),
        };
        Ok(EventStream::new(rx, guard))
    }
}
