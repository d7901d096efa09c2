use std::sync::{Arc, Mutex};
use std::time::Duration;

use foldernotify::present::{NotificationMessage, NotificationSurface};

/// A surface that remembers every message it was asked to present.
///
/// Clones share the same log, so a test keeps one while the dispatcher owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    seen: Arc<Mutex<Vec<NotificationMessage>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.seen.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.messages().iter().map(|m| m.title().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Poll (in real time) until at least `n` messages were presented.
    ///
    /// Returns `false` if `within` elapses first.
    pub async fn wait_for(&self, n: usize, within: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + within;
        while tokio::time::Instant::now() < deadline {
            if self.len() >= n {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.len() >= n
    }
}

impl NotificationSurface for RecordingSurface {
    fn present(&self, message: &NotificationMessage) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// A surface that fails (or panics) on every n-th call and records the rest.
#[derive(Debug, Clone)]
pub struct FlakySurface {
    inner: RecordingSurface,
    calls: Arc<Mutex<usize>>,
    fail_every: usize,
    panic_instead: bool,
}

impl FlakySurface {
    pub fn failing_every(n: usize) -> Self {
        Self {
            inner: RecordingSurface::new(),
            calls: Arc::new(Mutex::new(0)),
            fail_every: n.max(1),
            panic_instead: false,
        }
    }

    pub fn panicking_every(n: usize) -> Self {
        Self {
            panic_instead: true,
            ..Self::failing_every(n)
        }
    }

    pub fn recorded(&self) -> &RecordingSurface {
        &self.inner
    }
}

impl NotificationSurface for FlakySurface {
    fn present(&self, message: &NotificationMessage) -> anyhow::Result<()> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if call % self.fail_every == 0 {
            if self.panic_instead {
                panic!("surface exploded on call {call}");
            }
            anyhow::bail!("surface refused call {call}");
        }
        self.inner.present(message)
    }
}
