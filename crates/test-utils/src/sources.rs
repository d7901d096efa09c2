//! Event sources with awkward release timing.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use foldernotify::watch::{EventSource, EventStream, RawEvent};

/// Source whose first `stuck` watches block the releasing thread for `hold`
/// when they are dropped, the way a platform watcher can hang while it
/// tears down a large recursive watch. Later watches release immediately.
///
/// Never emits events; the stream stays open until the watch is dropped.
#[derive(Debug, Clone)]
pub struct SlowReleaseSource {
    state: Arc<SlowState>,
}

#[derive(Debug)]
struct SlowState {
    hold: Duration,
    stuck_left: AtomicUsize,
    watch_calls: AtomicUsize,
    live: AtomicUsize,
}

impl SlowReleaseSource {
    pub fn new(hold: Duration, stuck: usize) -> Self {
        Self {
            state: Arc::new(SlowState {
                hold,
                stuck_left: AtomicUsize::new(stuck),
                watch_calls: AtomicUsize::new(0),
                live: AtomicUsize::new(0),
            }),
        }
    }

    pub fn watch_calls(&self) -> usize {
        self.state.watch_calls.load(Ordering::SeqCst)
    }

    /// Watches not yet fully released.
    pub fn live_watches(&self) -> usize {
        self.state.live.load(Ordering::SeqCst)
    }
}

impl EventSource for SlowReleaseSource {
    fn watch(&self, _root: &Path) -> anyhow::Result<EventStream> {
        self.state.watch_calls.fetch_add(1, Ordering::SeqCst);
        self.state.live.fetch_add(1, Ordering::SeqCst);
        let stuck = self
            .state
            .stuck_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        let (tx, rx) = mpsc::unbounded_channel();
        Ok(EventStream::new(
            rx,
            SlowGuard {
                _events: tx,
                hold: stuck.then_some(self.state.hold),
                state: Arc::clone(&self.state),
            },
        ))
    }
}

struct SlowGuard {
    _events: mpsc::UnboundedSender<RawEvent>,
    hold: Option<Duration>,
    state: Arc<SlowState>,
}

impl Drop for SlowGuard {
    fn drop(&mut self) {
        if let Some(hold) = self.hold {
            std::thread::sleep(hold);
        }
        self.state.live.fetch_sub(1, Ordering::SeqCst);
    }
}
