// src/watch/window.rs

//! Fixed-window coalescing of filtered events.
//!
//! The first accepted event after a flush arms a deadline `delay` in the
//! future; everything accepted before the deadline joins the same batch and
//! does not move the deadline. Under a sustained stream of changes a folder
//! therefore still flushes once per `delay`.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::time::Instant;

use crate::watch::batch::{Change, PendingBatch};
use crate::watch::event::RawEvent;

/// A flushed window: everything that changed in one folder during one window.
#[derive(Debug, Clone)]
pub struct FolderBatch {
    /// Registry key of the folder.
    pub folder: PathBuf,
    /// Display name of the folder.
    pub name: String,
    /// Path the monitor actually watches (canonical form of `folder`).
    pub root: PathBuf,
    pub changes: Vec<Change>,
    pub closed_at: SystemTime,
}

#[derive(Debug)]
pub struct CoalescingWindow {
    folder: PathBuf,
    name: String,
    root: PathBuf,
    delay: Duration,
    pending: PendingBatch,
    deadline: Option<Instant>,
}

impl CoalescingWindow {
    pub fn new(folder: impl Into<PathBuf>, name: impl Into<String>, root: impl Into<PathBuf>, delay: Duration) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
            root: root.into(),
            delay,
            pending: PendingBatch::new(),
            deadline: None,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// When the armed window closes, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Merge an already-filtered event, arming the window if it is idle.
    pub fn accept(&mut self, event: RawEvent, now: Instant) {
        self.pending.record(event);
        if self.deadline.is_none() {
            self.deadline = Some(now + self.delay);
        }
    }

    /// Close the window and hand out its batch.
    ///
    /// Returns `None` if nothing was pending. The window is unarmed afterwards
    /// either way.
    pub fn flush(&mut self) -> Option<FolderBatch> {
        self.deadline = None;
        if self.pending.is_empty() {
            return None;
        }
        Some(FolderBatch {
            folder: self.folder.clone(),
            name: self.name.clone(),
            root: self.root.clone(),
            changes: self.pending.take(),
            closed_at: SystemTime::now(),
        })
    }

    /// Drop the pending batch without flushing it. Returns how many changes
    /// were dropped.
    pub fn discard(&mut self) -> usize {
        self.deadline = None;
        self.pending.take().len()
    }
}
