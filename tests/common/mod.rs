#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use foldernotify::config::{ConfigStore, Settings};
use foldernotify::engine::{delivery_queue, QueueReceiver, WatcherRegistry};
use foldernotify::fs::mock::MockFileSystem;
use foldernotify::watch::window::FolderBatch;
use foldernotify::watch::ManualEventSource;

pub use foldernotify_test_utils::builders;
pub use foldernotify_test_utils::{init_tracing, with_timeout};

pub const CONFIG_PATH: &str = "/config/foldernotify/folders.toml";

/// A registry wired to in-memory collaborators.
///
/// The mock filesystem backs both the config store and the registry's
/// directory checks, so a folder "exists" once `fs.add_dir` was called.
pub struct Harness {
    pub registry: WatcherRegistry,
    pub queue: QueueReceiver,
    pub source: ManualEventSource,
    pub fs: MockFileSystem,
    pub store: ConfigStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::with_fs(MockFileSystem::new(), settings)
    }

    pub fn with_fs(fs: MockFileSystem, settings: Settings) -> Self {
        let store = ConfigStore::new(Arc::new(fs.clone()), CONFIG_PATH);
        let source = ManualEventSource::new();
        let (tx, queue) = delivery_queue();
        let registry = WatcherRegistry::builder(store.clone(), tx)
            .source(source.clone())
            .fs(fs.clone())
            .settings(settings)
            .build()
            .expect("registry builds");
        Self {
            registry,
            queue,
            source,
            fs,
            store,
        }
    }

    /// Register a directory in the mock filesystem and return its path.
    pub fn dir(&self, path: &str) -> PathBuf {
        self.fs.add_dir(path);
        PathBuf::from(path)
    }

    /// Next flushed batch, or `None` if nothing arrives within `within`.
    ///
    /// Under a paused clock this auto-advances time.
    pub async fn next_batch(&mut self, within: Duration) -> Option<FolderBatch> {
        tokio::time::timeout(within, self.queue.recv()).await.ok().flatten()
    }
}

pub fn paths(batch: &FolderBatch) -> Vec<PathBuf> {
    batch.changes.iter().map(|c| c.path.clone()).collect()
}

pub fn p(path: &str) -> &Path {
    Path::new(path)
}
