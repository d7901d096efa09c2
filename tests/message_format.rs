// tests/message_format.rs
use std::path::PathBuf;
use std::time::SystemTime;

use foldernotify::present::format_batch;
use foldernotify::types::NotificationStyle;
use foldernotify::watch::{Change, ChangeKind, FolderBatch};

const ROOT: &str = "/home/me/Documents";

fn change(kind: ChangeKind, rel: &str) -> Change {
    Change {
        kind,
        path: PathBuf::from(ROOT).join(rel),
        dest: None,
        is_directory: false,
    }
}

fn batch(changes: Vec<Change>) -> FolderBatch {
    FolderBatch {
        folder: PathBuf::from(ROOT),
        name: "Documents".to_string(),
        root: PathBuf::from(ROOT),
        changes,
        closed_at: SystemTime::now(),
    }
}

#[test]
fn single_change_names_the_file() {
    let msgs = format_batch(
        &batch(vec![change(ChangeKind::Created, "Taxes/2024.pdf")]),
        NotificationStyle::Combined,
    );
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].title(), "Documents: file created");
    assert_eq!(msgs[0].body(), "Taxes/2024.pdf");
    assert_eq!(msgs[0].folder(), PathBuf::from(ROOT));
}

#[test]
fn many_changes_become_one_summary() {
    let mut moved = change(ChangeKind::Moved, "draft.md");
    moved.dest = Some(PathBuf::from(ROOT).join("final.md"));
    let mut dir = change(ChangeKind::Deleted, "old");
    dir.is_directory = true;

    let msgs = format_batch(
        &batch(vec![change(ChangeKind::Modified, "notes.txt"), moved, dir]),
        NotificationStyle::Combined,
    );

    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].title(), "Documents: 3 files changed");
    assert_eq!(
        msgs[0].body(),
        "notes.txt (modified)\ndraft.md -> final.md (moved)\nold/ (deleted)"
    );
    assert_eq!(
        msgs[0].affected_paths(),
        &[
            PathBuf::from(ROOT).join("notes.txt"),
            PathBuf::from(ROOT).join("final.md"),
            PathBuf::from(ROOT).join("old"),
        ]
    );
}

#[test]
fn affected_paths_are_listed_once() {
    let mut moved = change(ChangeKind::Moved, "draft.md");
    moved.dest = Some(PathBuf::from(ROOT).join("final.md"));

    let msgs = format_batch(
        &batch(vec![change(ChangeKind::Modified, "final.md"), moved]),
        NotificationStyle::Combined,
    );

    assert_eq!(msgs[0].title(), "Documents: 2 files changed");
    assert_eq!(msgs[0].affected_paths(), &[PathBuf::from(ROOT).join("final.md")]);
}

#[test]
fn single_folder_change_says_folder() {
    let mut dir = change(ChangeKind::Created, "Photos");
    dir.is_directory = true;
    let msgs = format_batch(&batch(vec![dir]), NotificationStyle::Combined);
    assert_eq!(msgs[0].title(), "Documents: folder created");
    assert_eq!(msgs[0].body(), "Photos/");
}

#[test]
fn per_file_style_splits_the_batch() {
    let mut moved = change(ChangeKind::Moved, "a.txt");
    moved.dest = Some(PathBuf::from(ROOT).join("b.txt"));

    let msgs = format_batch(
        &batch(vec![change(ChangeKind::Deleted, "x.txt"), moved]),
        NotificationStyle::PerFile,
    );

    let bodies: Vec<&str> = msgs.iter().map(|m| m.body()).collect();
    assert_eq!(bodies, vec!["x.txt was deleted", "a.txt moved to b.txt"]);
    assert!(msgs.iter().all(|m| m.title() == "Documents"));
}

#[test]
fn empty_batch_formats_to_nothing() {
    assert!(format_batch(&batch(Vec::new()), NotificationStyle::Combined).is_empty());
    assert!(format_batch(&batch(Vec::new()), NotificationStyle::PerFile).is_empty());
}
