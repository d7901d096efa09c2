// src/present/message.rs

use std::path::{Path, PathBuf};

use crate::types::NotificationStyle;
use crate::watch::batch::Change;
use crate::watch::event::ChangeKind;
use crate::watch::path_utils::display_relative;
use crate::watch::window::FolderBatch;

/// A formatted notification, ready for a surface.
///
/// Fields are private so a message cannot change after formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    folder: PathBuf,
    title: String,
    body: String,
    affected_paths: Vec<PathBuf>,
}

impl NotificationMessage {
    pub fn new(
        folder: impl Into<PathBuf>,
        title: impl Into<String>,
        body: impl Into<String>,
        affected_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            folder: folder.into(),
            title: title.into(),
            body: body.into(),
            affected_paths,
        }
    }

    /// Registry key of the folder this message is about.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn affected_paths(&self) -> &[PathBuf] {
        &self.affected_paths
    }
}

/// Turn a flushed batch into the messages to present, according to `style`.
pub fn format_batch(batch: &FolderBatch, style: NotificationStyle) -> Vec<NotificationMessage> {
    if batch.changes.is_empty() {
        return Vec::new();
    }
    match style {
        NotificationStyle::Combined => vec![combined(batch)],
        NotificationStyle::PerFile => batch
            .changes
            .iter()
            .map(|change| per_file(batch, change))
            .collect(),
    }
}

fn combined(batch: &FolderBatch) -> NotificationMessage {
    let mut affected: Vec<PathBuf> = Vec::with_capacity(batch.changes.len());
    for change in &batch.changes {
        let path = change.affected_path();
        if !affected.iter().any(|seen| seen == path) {
            affected.push(path.to_path_buf());
        }
    }

    if let [change] = batch.changes.as_slice() {
        let title = format!("{}: {} {}", batch.name, noun(change), change.kind.verb());
        return NotificationMessage::new(&batch.folder, title, describe_path(batch, change), affected);
    }

    let title = format!("{}: {} files changed", batch.name, batch.changes.len());
    let body = batch
        .changes
        .iter()
        .map(|c| format!("{} ({})", describe_path(batch, c), c.kind.verb()))
        .collect::<Vec<_>>()
        .join("\n");
    NotificationMessage::new(&batch.folder, title, body, affected)
}

fn per_file(batch: &FolderBatch, change: &Change) -> NotificationMessage {
    let body = match (&change.kind, &change.dest) {
        (ChangeKind::Moved, Some(dest)) => format!(
            "{} moved to {}",
            display_name(batch, &change.path, change.is_directory),
            display_name(batch, dest, change.is_directory)
        ),
        (kind, _) => format!(
            "{} was {}",
            display_name(batch, &change.path, change.is_directory),
            kind.verb()
        ),
    };
    NotificationMessage::new(
        &batch.folder,
        batch.name.clone(),
        body,
        vec![change.affected_path().to_path_buf()],
    )
}

fn describe_path(batch: &FolderBatch, change: &Change) -> String {
    match &change.dest {
        Some(dest) => format!(
            "{} -> {}",
            display_name(batch, &change.path, change.is_directory),
            display_name(batch, dest, change.is_directory)
        ),
        None => display_name(batch, &change.path, change.is_directory),
    }
}

fn display_name(batch: &FolderBatch, path: &Path, is_directory: bool) -> String {
    let mut s = display_relative(&batch.root, path);
    if is_directory {
        s.push('/');
    }
    s
}

fn noun(change: &Change) -> &'static str {
    if change.is_directory { "folder" } else { "file" }
}
