// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

/// Basenames that are always noise: OS metadata, editor swap and lock files,
/// office owner files, and hidden entries in general.
pub const BUILTIN_IGNORES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "~$*",
    "._*",
    ".*",
    "*.tmp",
    "*.swp",
    "*.swx",
    "*~",
    "*.crdownload",
    "*.part",
    ".~lock.*#",
];

/// Compile a single basename glob.
///
/// `*` must not cross `/` so a pattern like `*.tmp` can never accidentally
/// match a path rather than a name.
pub fn compile_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))
}

/// Compiled set of ignored basename patterns.
#[derive(Clone)]
pub struct IgnorePatterns {
    set: GlobSet,
    patterns: Vec<String>,
}

impl fmt::Debug for IgnorePatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnorePatterns")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl IgnorePatterns {
    /// Built-in list plus user-supplied `extra` patterns.
    pub fn with_extra(extra: &[String]) -> Result<Self> {
        let patterns: Vec<String> = BUILTIN_IGNORES
            .iter()
            .map(|p| p.to_string())
            .chain(extra.iter().cloned())
            .collect();
        Self::from_patterns(patterns)
    }

    pub fn builtin() -> Result<Self> {
        Self::with_extra(&[])
    }

    fn from_patterns(patterns: Vec<String>) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pat in &patterns {
            builder.add(compile_glob(pat)?);
        }
        let set = builder.build().context("building ignore globset")?;
        Ok(Self { set, patterns })
    }

    /// True if `name` (a single path component) is ignored.
    pub fn is_ignored_name(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
