// src/watch/event.rs

//! Raw filesystem events as produced by an [`EventSource`](super::EventSource).

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind, RenameMode};

/// Kind of a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Modified,
    Moved,
    Deleted,
}

impl ChangeKind {
    /// Combine the kind already pending for a path with a newer one.
    ///
    /// - `Deleted` is sticky: nothing later in the same window resurrects it.
    /// - A newly `Created` path that is then written to stays `Created`.
    /// - Otherwise the newer kind wins.
    pub fn merge(self, newer: ChangeKind) -> ChangeKind {
        match (self, newer) {
            (ChangeKind::Deleted, _) => ChangeKind::Deleted,
            (ChangeKind::Created, ChangeKind::Modified) => ChangeKind::Created,
            (_, newer) => newer,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Modified => "modified",
            ChangeKind::Moved => "moved",
            ChangeKind::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: ChangeKind,
    pub source_path: PathBuf,
    /// Destination of a move; `None` for every other kind.
    pub dest_path: Option<PathBuf>,
    pub is_directory: bool,
    pub timestamp: SystemTime,
}

impl RawEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            source_path: path.into(),
            dest_path: None,
            is_directory: false,
            timestamp: SystemTime::now(),
        }
    }

    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Created, path)
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Modified, path)
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Deleted, path)
    }

    pub fn moved(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            dest_path: Some(to.into()),
            ..Self::new(ChangeKind::Moved, from)
        }
    }

    pub fn directory(mut self) -> Self {
        self.is_directory = true;
        self
    }

    /// The path a user would look for after the change: the destination of a
    /// move, the source otherwise.
    pub fn affected_path(&self) -> &Path {
        self.dest_path.as_deref().unwrap_or(&self.source_path)
    }

    /// Translate one `notify` event into zero or more raw events.
    ///
    /// Access events and anything `notify` cannot classify are dropped here;
    /// they never describe a change a user cares about.
    pub fn from_notify(event: &notify::Event) -> Vec<RawEvent> {
        let timestamp = SystemTime::now();
        let make = |kind: ChangeKind, path: &Path, dest: Option<&Path>, dir_hint: Option<bool>| {
            RawEvent {
                kind,
                source_path: path.to_path_buf(),
                dest_path: dest.map(Path::to_path_buf),
                is_directory: dir_hint.unwrap_or_else(|| dest.unwrap_or(path).is_dir()),
                timestamp,
            }
        };

        match event.kind {
            EventKind::Create(kind) => {
                let dir = match kind {
                    CreateKind::Folder => Some(true),
                    CreateKind::File => Some(false),
                    _ => None,
                };
                event
                    .paths
                    .iter()
                    .map(|p| make(ChangeKind::Created, p.as_path(), None, dir))
                    .collect()
            }
            EventKind::Remove(kind) => {
                // The path is gone, so only the event itself can say what it was.
                let dir = Some(matches!(kind, RemoveKind::Folder));
                event
                    .paths
                    .iter()
                    .map(|p| make(ChangeKind::Deleted, p.as_path(), None, dir))
                    .collect()
            }
            EventKind::Modify(ModifyKind::Name(mode)) => match (mode, event.paths.as_slice()) {
                (RenameMode::Both, [from, to, ..]) => {
                    vec![make(ChangeKind::Moved, from.as_path(), Some(to.as_path()), None)]
                }
                (RenameMode::From, paths) => paths
                    .iter()
                    .map(|p| make(ChangeKind::Deleted, p.as_path(), None, Some(false)))
                    .collect(),
                (RenameMode::To, paths) => paths
                    .iter()
                    .map(|p| make(ChangeKind::Created, p.as_path(), None, None))
                    .collect(),
                // Platforms that cannot pair rename halves report `Any`; the
                // path either exists now (moved in) or it does not (moved out).
                (_, paths) => paths
                    .iter()
                    .map(|p| {
                        if p.exists() {
                            make(ChangeKind::Created, p.as_path(), None, None)
                        } else {
                            make(ChangeKind::Deleted, p.as_path(), None, Some(false))
                        }
                    })
                    .collect(),
            },
            EventKind::Modify(_) => event
                .paths
                .iter()
                .map(|p| make(ChangeKind::Modified, p.as_path(), None, None))
                .collect(),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
        }
    }
}
