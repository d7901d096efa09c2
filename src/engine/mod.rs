// src/engine/mod.rs

//! Runtime side of foldernotify.
//!
//! This module ties together:
//! - the per-folder monitors (watch + filter + coalescing window)
//! - the delivery queue every monitor pushes flushed batches into
//! - the single dispatcher that drains the queue into a notification surface
//! - the registry that owns the monitors and persists the folder list

pub mod dispatcher;
pub mod monitor;
pub mod queue;
pub mod registry;

pub use dispatcher::{DispatchStats, Dispatcher};
pub use monitor::{spawn_monitor, MonitorHandle, MonitorSpec, StopOutcome};
pub use queue::{delivery_queue, QueueReceiver, QueueSender};
pub use registry::{FolderInfo, ReconcileReport, RegistryBuilder, WatcherRegistry};
