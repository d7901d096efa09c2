// src/watch/filter.rs

//! Noise filter applied to every raw event before it reaches a coalescing
//! window.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::watch::event::{ChangeKind, RawEvent};
use crate::watch::path_utils::any_component_below;
use crate::watch::patterns::IgnorePatterns;

/// Why an event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Hidden, system, temp or lock artifact.
    Ignored,
    /// Below one of the folder's excluded subpaths.
    Excluded,
    /// Directory `Modified`: a side effect of a change to one of its entries,
    /// which is reported on its own.
    DirectoryTouch,
    /// Outside the watched folder altogether.
    Foreign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Keep,
    Discard(DiscardReason),
}

impl FilterDecision {
    pub fn is_keep(self) -> bool {
        matches!(self, FilterDecision::Keep)
    }
}

/// Per-folder filter configuration.
///
/// `decide` is a pure function of the event and this configuration; the
/// filter keeps no history.
#[derive(Debug, Clone)]
pub struct EventFilter {
    root: PathBuf,
    excluded: Vec<PathBuf>,
    ignores: Arc<IgnorePatterns>,
}

impl EventFilter {
    pub fn new(root: impl Into<PathBuf>, excluded: Vec<PathBuf>, ignores: Arc<IgnorePatterns>) -> Self {
        Self {
            root: root.into(),
            excluded,
            ignores,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn decide(&self, event: &RawEvent) -> FilterDecision {
        if event.is_directory && event.kind == ChangeKind::Modified {
            return FilterDecision::Discard(DiscardReason::DirectoryTouch);
        }

        match &event.dest_path {
            // A move is only noise when both ends are: renaming `x.tmp` to
            // `report.pdf` is how many programs save.
            Some(dest) => {
                let from = self.path_decision(&event.source_path);
                let to = self.path_decision(dest);
                if from.is_keep() || to.is_keep() {
                    FilterDecision::Keep
                } else {
                    to
                }
            }
            None => self.path_decision(&event.source_path),
        }
    }

    fn path_decision(&self, path: &Path) -> FilterDecision {
        if !path.starts_with(&self.root) {
            return FilterDecision::Discard(DiscardReason::Foreign);
        }
        if self.excluded.iter().any(|ex| path.starts_with(ex)) {
            return FilterDecision::Discard(DiscardReason::Excluded);
        }
        if any_component_below(&self.root, path, |name| self.ignores.is_ignored_name(name)) {
            return FilterDecision::Discard(DiscardReason::Ignored);
        }
        FilterDecision::Keep
    }
}
