// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Turning platform notifications (`notify`) into [`RawEvent`]s.
//! - Deciding which raw events are noise ([`EventFilter`]).
//! - Merging the rest into one [`FolderBatch`] per folder per window
//!   ([`CoalescingWindow`]).
//!
//! It does **not** know about the registry or how batches are presented; the
//! engine wires a window to a source and a delivery queue.

pub mod batch;
pub mod event;
pub mod filter;
pub mod manual;
pub mod path_utils;
pub mod patterns;
pub mod source;
pub mod window;

pub use batch::{Change, PendingBatch};
pub use event::{ChangeKind, RawEvent};
pub use filter::{DiscardReason, EventFilter, FilterDecision};
pub use manual::ManualEventSource;
pub use patterns::{IgnorePatterns, BUILTIN_IGNORES};
pub use source::{EventSource, EventStream, NotifyEventSource};
pub use window::{CoalescingWindow, FolderBatch};
