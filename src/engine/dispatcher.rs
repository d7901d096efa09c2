// src/engine/dispatcher.rs

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::queue::QueueReceiver;
use crate::present::{format_batch, NotificationSurface};
use crate::types::NotificationStyle;

/// Counters reported when the dispatcher loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub batches: usize,
    pub presented: usize,
    pub failed: usize,
}

/// Single consumer of the delivery queue.
///
/// Pops one batch at a time, formats it, and hands each resulting message to
/// the surface before looking at the next batch. A surface error (or panic)
/// is logged and the loop moves on.
pub struct Dispatcher {
    queue: QueueReceiver,
    surface: Arc<dyn NotificationSurface>,
    style: NotificationStyle,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        queue: QueueReceiver,
        surface: Arc<dyn NotificationSurface>,
        style: NotificationStyle,
    ) -> Self {
        Self {
            queue,
            surface,
            style,
        }
    }

    /// Run the loop on its own task.
    pub fn spawn(self) -> JoinHandle<DispatchStats> {
        tokio::spawn(self.run())
    }

    /// Main loop. Returns once every queue sender is gone and the queue has
    /// been drained.
    pub async fn run(mut self) -> DispatchStats {
        info!("notification dispatcher started");
        let mut stats = DispatchStats::default();

        while let Some(batch) = self.queue.recv().await {
            stats.batches += 1;
            debug!(
                folder = ?batch.folder,
                changes = batch.changes.len(),
                "dispatching batch"
            );

            for message in format_batch(&batch, self.style) {
                let surface = Arc::clone(&self.surface);
                let title = message.title().to_string();

                // Surfaces may block (OS notification APIs often do), so keep
                // them off the async workers.
                let outcome =
                    tokio::task::spawn_blocking(move || surface.present(&message)).await;

                match outcome {
                    Ok(Ok(())) => stats.presented += 1,
                    Ok(Err(err)) => {
                        stats.failed += 1;
                        warn!(title = %title, error = %err, "notification surface failed");
                    }
                    Err(join_err) => {
                        stats.failed += 1;
                        warn!(title = %title, error = %join_err, "notification surface panicked");
                    }
                }
            }
        }

        info!(
            batches = stats.batches,
            presented = stats.presented,
            failed = stats.failed,
            "notification dispatcher finished (queue closed)"
        );
        stats
    }
}
