// src/engine/queue.rs

//! Delivery queue between the coalescing windows and the dispatcher.
//!
//! Many producers (one per running monitor), exactly one consumer. The queue
//! is an unbounded Tokio channel, so a push never blocks a window's flush
//! path and never fails while the consumer is alive. Batches from one
//! producer arrive in push order.

use tokio::sync::mpsc;
use tracing::debug;

use crate::watch::window::FolderBatch;

/// Create a connected sender/receiver pair.
pub fn delivery_queue() -> (QueueSender, QueueReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueueSender { tx }, QueueReceiver { rx })
}

/// Producer side. Cheap to clone; every monitor holds one.
#[derive(Debug, Clone)]
pub struct QueueSender {
    tx: mpsc::UnboundedSender<FolderBatch>,
}

impl QueueSender {
    /// Push a flushed batch.
    ///
    /// Returns `false` only if the consumer has already gone away (during
    /// shutdown), in which case the batch is dropped.
    pub fn push(&self, batch: FolderBatch) -> bool {
        match self.tx.send(batch) {
            Ok(()) => true,
            Err(mpsc::error::SendError(batch)) => {
                debug!(
                    folder = ?batch.folder,
                    changes = batch.changes.len(),
                    "delivery queue closed; dropping batch"
                );
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side, owned by the dispatcher.
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::UnboundedReceiver<FolderBatch>,
}

impl QueueReceiver {
    /// Wait for the next batch. `None` once every sender is dropped and the
    /// queue is drained.
    pub async fn recv(&mut self) -> Option<FolderBatch> {
        self.rx.recv().await
    }

    /// Non-blocking pop.
    pub fn try_recv(&mut self) -> Option<FolderBatch> {
        self.rx.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
