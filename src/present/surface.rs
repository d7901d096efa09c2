// src/present/surface.rs

//! Pluggable notification surface.
//!
//! The dispatcher hands every formatted message to a `NotificationSurface`.
//! A desktop shell would implement this with its toast API (marshalling onto
//! its UI thread itself); the CLI uses [`LogSurface`]. Tests record messages
//! instead.

use anyhow::Result;
use tracing::info;

use crate::present::message::NotificationMessage;

pub trait NotificationSurface: Send + Sync {
    /// Show one message.
    ///
    /// Called from a blocking worker thread, one message at a time. Errors
    /// are logged by the dispatcher and never retried.
    fn present(&self, message: &NotificationMessage) -> Result<()>;
}

/// Writes notifications to stdout and the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSurface;

impl NotificationSurface for LogSurface {
    fn present(&self, message: &NotificationMessage) -> Result<()> {
        println!("[foldernotify] {}", message.title());
        for line in message.body().lines() {
            println!("    {line}");
        }
        info!(
            folder = ?message.folder(),
            title = %message.title(),
            paths = message.affected_paths().len(),
            "notification presented"
        );
        Ok(())
    }
}
