// src/present/mod.rs

//! Turning flushed batches into human-readable notifications and handing them
//! to whatever surface the shell provides.

pub mod message;
pub mod surface;

pub use message::{format_batch, NotificationMessage};
pub use surface::{LogSurface, NotificationSurface};
