// src/watch/batch.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::watch::event::{ChangeKind, RawEvent};

/// One deduplicated change inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub path: PathBuf,
    /// Destination of a move.
    pub dest: Option<PathBuf>,
    pub is_directory: bool,
}

impl Change {
    /// Where the change can be found now.
    pub fn affected_path(&self) -> &Path {
        self.dest.as_deref().unwrap_or(&self.path)
    }
}

/// Events accumulated by one coalescing window since it was armed.
///
/// Entries are keyed by source path (and, for moves, destination path) and
/// kept in first-seen order, so the flushed batch lists files in the order
/// they first changed.
#[derive(Debug, Default)]
pub struct PendingBatch {
    index: HashMap<PathBuf, usize>,
    changes: Vec<Change>,
}

impl PendingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Merge `event` into the batch.
    ///
    /// A path seen before keeps its position; its kind is combined with
    /// [`ChangeKind::merge`]. The destination of a pending move is tracked
    /// too, so a later event on it folds into the move: writes keep it a
    /// move, a further move retargets it, a delete turns it into a delete of
    /// the original path.
    pub fn record(&mut self, event: RawEvent) {
        let RawEvent {
            kind,
            source_path,
            dest_path,
            is_directory,
            ..
        } = event;

        let Some(&idx) = self.index.get(&source_path) else {
            let idx = self.changes.len();
            self.index.insert(source_path.clone(), idx);
            if let Some(dest) = &dest_path {
                self.index.entry(dest.clone()).or_insert(idx);
            }
            self.changes.push(Change {
                kind,
                path: source_path,
                dest: dest_path,
                is_directory,
            });
            return;
        };

        let existing = &mut self.changes[idx];
        let at_destination = existing.dest.as_deref() == Some(source_path.as_path());
        let merged = match (at_destination, kind) {
            (true, ChangeKind::Created | ChangeKind::Modified) => ChangeKind::Moved,
            _ => existing.kind.merge(kind),
        };
        let previous_dest = existing.dest.take();
        existing.kind = merged;
        existing.dest = match merged {
            ChangeKind::Moved => dest_path.or_else(|| previous_dest.clone()),
            _ => None,
        };
        existing.is_directory |= is_directory;

        let current_dest = existing.dest.clone();
        if let Some(old) = previous_dest.filter(|old| Some(old) != current_dest.as_ref()) {
            if self.index.get(&old) == Some(&idx) && old != self.changes[idx].path {
                self.index.remove(&old);
            }
        }
        if let Some(dest) = current_dest {
            self.index.entry(dest).or_insert(idx);
        }
    }

    /// Swap the accumulated changes out, leaving the batch empty.
    pub fn take(&mut self) -> Vec<Change> {
        self.index.clear();
        std::mem::take(&mut self.changes)
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }
}
