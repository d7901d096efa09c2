// src/watch/source.rs

use std::any::Any;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::watch::event::RawEvent;

/// Anything that can watch a directory tree recursively and report raw
/// events for it.
///
/// Events are delivered on an unbounded channel from whatever thread the
/// implementation uses; the consumer side lives in a Tokio task.
pub trait EventSource: Send + Sync {
    fn watch(&self, path: &Path) -> Result<EventStream>;
}

/// A live watch: the event receiver plus whatever keeps the watch alive.
///
/// Dropping the stream (or calling [`EventStream::unwatch`]) stops the
/// underlying watch.
pub struct EventStream {
    events: mpsc::UnboundedReceiver<RawEvent>,
    _guard: Box<dyn Any + Send>,
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream").finish_non_exhaustive()
    }
}

impl EventStream {
    pub fn new(events: mpsc::UnboundedReceiver<RawEvent>, guard: impl Any + Send) -> Self {
        Self {
            events,
            _guard: Box::new(guard),
        }
    }

    /// Next event, or `None` once the source has shut down.
    pub async fn recv(&mut self) -> Option<RawEvent> {
        self.events.recv().await
    }

    pub fn unwatch(self) {
        drop(self);
    }
}

/// Production source backed by `notify`'s platform watcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyEventSource;

impl EventSource for NotifyEventSource {
    fn watch(&self, path: &Path) -> Result<EventStream> {
        let (tx, rx) = mpsc::unbounded_channel::<RawEvent>();

        // Called synchronously on notify's own thread.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for raw in RawEvent::from_notify(&event) {
                        // The receiver is gone only while the monitor is
                        // being torn down.
                        if tx.send(raw).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, "file watch error");
                }
            },
            Config::default(),
        )
        .context("creating platform file watcher")?;

        watcher
            .watch(path, RecursiveMode::Recursive)
            .with_context(|| format!("watching {:?}", path))?;

        info!("file watcher started on {:?}", path);
        Ok(EventStream::new(rx, watcher))
    }
}
