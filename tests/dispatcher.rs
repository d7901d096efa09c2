// tests/dispatcher.rs
mod common;
use crate::common::{init_tracing, with_timeout};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use foldernotify::engine::{delivery_queue, DispatchStats, Dispatcher};
use foldernotify::types::NotificationStyle;
use foldernotify::watch::{Change, ChangeKind, FolderBatch};
use foldernotify_test_utils::surfaces::{FlakySurface, RecordingSurface};

fn batch(folder: &str, files: &[&str]) -> FolderBatch {
    let root = PathBuf::from(folder);
    FolderBatch {
        folder: root.clone(),
        name: root.file_name().unwrap().to_string_lossy().into_owned(),
        root: root.clone(),
        changes: files
            .iter()
            .map(|f| Change {
                kind: ChangeKind::Modified,
                path: root.join(f),
                dest: None,
                is_directory: false,
            })
            .collect(),
        closed_at: SystemTime::now(),
    }
}

#[tokio::test]
async fn batches_are_presented_in_queue_order() {
    with_timeout(async {
        init_tracing();
        let surface = RecordingSurface::new();
        let (tx, rx) = delivery_queue();
        let task = Dispatcher::new(rx, Arc::new(surface.clone()), NotificationStyle::Combined).spawn();

        assert!(tx.push(batch("/w/alpha", &["1.txt"])));
        assert!(tx.push(batch("/w/beta", &["2.txt", "3.txt"])));
        assert!(tx.push(batch("/w/alpha", &["4.txt"])));
        drop(tx);

        let stats = task.await.unwrap();
        assert_eq!(
            stats,
            DispatchStats {
                batches: 3,
                presented: 3,
                failed: 0
            }
        );
        assert_eq!(
            surface.titles(),
            vec![
                "alpha: file modified".to_string(),
                "beta: 2 files changed".to_string(),
                "alpha: file modified".to_string(),
            ]
        );
        assert_eq!(surface.messages()[2].body(), "4.txt");
    })
    .await
}

#[tokio::test]
async fn per_file_style_presents_each_change() {
    with_timeout(async {
        init_tracing();
        let surface = RecordingSurface::new();
        let (tx, rx) = delivery_queue();
        let task = Dispatcher::new(rx, Arc::new(surface.clone()), NotificationStyle::PerFile).spawn();

        tx.push(batch("/w/alpha", &["a", "b", "c"]));
        drop(tx);

        let stats = task.await.unwrap();
        assert_eq!(stats.batches, 1);
        assert_eq!(stats.presented, 3);
        assert_eq!(surface.len(), 3);
    })
    .await
}

#[tokio::test]
async fn failing_surface_does_not_stop_delivery() {
    with_timeout(async {
        init_tracing();
        let surface = FlakySurface::failing_every(2);
        let (tx, rx) = delivery_queue();
        let task = Dispatcher::new(rx, Arc::new(surface.clone()), NotificationStyle::Combined).spawn();

        for i in 0..4 {
            tx.push(batch("/w/alpha", &[format!("{i}.txt").as_str()]));
        }
        drop(tx);

        let stats = task.await.unwrap();
        assert_eq!(stats.presented, 2);
        assert_eq!(stats.failed, 2);
        let bodies: Vec<String> = surface
            .recorded()
            .messages()
            .iter()
            .map(|m| m.body().to_string())
            .collect();
        assert_eq!(bodies, vec!["0.txt".to_string(), "2.txt".to_string()]);
    })
    .await
}

#[tokio::test]
async fn panicking_surface_does_not_stop_delivery() {
    with_timeout(async {
        init_tracing();
        let surface = FlakySurface::panicking_every(1);
        let (tx, rx) = delivery_queue();
        let task = Dispatcher::new(rx, Arc::new(surface), NotificationStyle::Combined).spawn();

        tx.push(batch("/w/alpha", &["a"]));
        tx.push(batch("/w/alpha", &["b"]));
        drop(tx);

        let stats = task.await.unwrap();
        assert_eq!(stats.batches, 2);
        assert_eq!(stats.failed, 2);
    })
    .await
}

#[tokio::test]
async fn push_after_dispatcher_is_gone_reports_false() {
    let (tx, rx) = delivery_queue();
    drop(rx);
    assert!(tx.is_closed());
    assert!(!tx.push(batch("/w/alpha", &["a"])));
}

#[tokio::test]
async fn registry_batches_reach_the_surface() {
    use foldernotify::config::{ConfigStore, Settings};
    use foldernotify::engine::WatcherRegistry;
    use foldernotify::fs::mock::MockFileSystem;
    use foldernotify::watch::{ManualEventSource, RawEvent};

    with_timeout(async {
        init_tracing();
        let fs = MockFileSystem::new();
        fs.add_dir("/w/inbox");
        let source = ManualEventSource::new();
        let surface = RecordingSurface::new();
        let (tx, rx) = delivery_queue();
        let task = Dispatcher::new(rx, Arc::new(surface.clone()), NotificationStyle::Combined).spawn();

        let registry = WatcherRegistry::builder(ConfigStore::new(Arc::new(fs.clone()), "/cfg.toml"), tx)
            .source(source.clone())
            .fs(fs)
            .settings(Settings {
                coalesce_ms: 50,
                ..Settings::default()
            })
            .build()
            .unwrap();
        registry.add_folder("/w/inbox").await.unwrap();

        source.emit(RawEvent::created("/w/inbox/scan-001.pdf"));
        source.emit(RawEvent::created("/w/inbox/scan-002.pdf"));
        assert!(surface.wait_for(1, std::time::Duration::from_secs(2)).await);

        registry.shutdown().await.unwrap();
        drop(registry);
        let stats = task.await.unwrap();

        assert_eq!(stats.batches, 1);
        assert_eq!(surface.titles(), vec!["inbox: 2 files changed".to_string()]);
        assert_eq!(surface.messages()[0].body(), "scan-001.pdf (created)\nscan-002.pdf (created)");
    })
    .await
}
