// tests/config_store.rs
mod common;
use crate::common::builders::{ConfigFileBuilder, FolderRecordBuilder};
use crate::common::{init_tracing, CONFIG_PATH};

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use foldernotify::config::edit;
use foldernotify::config::{parse_config, resolve_config_path, ConfigFile, ConfigStore};
use foldernotify::errors::FolderNotifyError;
use foldernotify::fs::mock::MockFileSystem;
use foldernotify::types::NotificationStyle;

type TestResult = Result<(), Box<dyn Error>>;

fn store(fs: &MockFileSystem) -> ConfigStore {
    ConfigStore::new(Arc::new(fs.clone()), CONFIG_PATH)
}

#[test]
fn missing_file_means_no_folders() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let cfg = store(&fs).load()?;
    assert_eq!(cfg, ConfigFile::default());
    assert_eq!(cfg.settings.coalesce_ms, 1000);
    Ok(())
}

#[test]
fn malformed_file_is_an_error_for_load_but_empty_for_startup() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(CONFIG_PATH, "[[folder]\npath = ");

    let err = store(&fs).load().unwrap_err();
    assert!(matches!(err, FolderNotifyError::ConfigDecode(_)));

    let cfg = store(&fs).load_or_default();
    assert!(cfg.folders.is_empty());
}

#[test]
fn wrong_types_are_decode_errors() {
    let err = parse_config("[[folder]]\npath = 42\n").unwrap_err();
    assert!(matches!(err, FolderNotifyError::ConfigDecode(_)));
}

#[test]
fn saved_configuration_loads_back_identically() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let cfg = ConfigFileBuilder::new()
        .coalesce_ms(2500)
        .style(NotificationStyle::PerFile)
        .ignore("*.log")
        .with_folder(FolderRecordBuilder::new("/home/me/Documents").name("Docs").exclude("cache").build())
        .with_folder(FolderRecordBuilder::new("/home/me/Music").inactive().build())
        .build();

    store(&fs).save(&cfg)?;
    assert_eq!(fs.write_count(), 1);
    assert_eq!(store(&fs).load()?, cfg);

    let text = fs.contents(CONFIG_PATH).expect("file written");
    assert!(text.contains("[[folder]]"));
    assert!(text.contains("style = \"per_file\""));
    Ok(())
}

#[test]
fn documented_example_parses() -> TestResult {
    let cfg = parse_config(
        r#"
[settings]
coalesce_ms = 750
style = "combined"
ignore = ["*.bak"]

[[folder]]
path = "/home/me/Documents"
name = "Documents"
excluded_subpaths = ["node_modules", "/home/me/Documents/Archive"]

[[folder]]
path = "/home/me/Downloads"
active = false
"#,
    )?;

    assert_eq!(cfg.settings.coalesce_ms, 750);
    assert_eq!(cfg.settings.stop_timeout_ms, 1000);
    assert_eq!(cfg.folders.len(), 2);
    assert!(cfg.folders[0].active);
    assert_eq!(
        cfg.folders[0].excluded_subpaths,
        vec![
            PathBuf::from("/home/me/Documents/node_modules"),
            PathBuf::from("/home/me/Documents/Archive"),
        ]
    );
    assert!(!cfg.folders[1].active);
    assert_eq!(cfg.folders[1].display_name(), "Downloads");
    Ok(())
}

#[test]
fn validation_repairs_instead_of_rejecting() -> TestResult {
    init_tracing();
    let cfg = parse_config(
        r#"
[settings]
coalesce_ms = 0
ignore = ["[unclosed", "*.bak"]

[[folder]]
path = "relative/dir"

[[folder]]
path = "/srv/share"

[[folder]]
path = "/srv/share"
active = false

[[folder]]
path = "/srv/x/../share/."
"#,
    )?;

    assert_eq!(cfg.settings.coalesce_ms, 1);
    assert_eq!(cfg.settings.ignore, vec!["*.bak".to_string()]);
    assert_eq!(cfg.folders.len(), 1);
    assert_eq!(cfg.folders[0].path, Path::new("/srv/share"));
    assert!(cfg.folders[0].active);
    Ok(())
}

#[test]
fn explicit_path_wins_resolution() {
    let explicit = Path::new("/tmp/custom.toml");
    assert_eq!(resolve_config_path(Some(explicit)), explicit);
    assert!(resolve_config_path(None).is_absolute() || resolve_config_path(None).ends_with("foldernotify.toml"));
}

#[test]
fn offline_edits_fold_dotted_paths() -> TestResult {
    let mut cfg = ConfigFile::default();
    let docs = Path::new("/home/me/Documents");
    edit::add_folder(&mut cfg, docs)?;

    assert!(matches!(
        edit::add_folder(&mut cfg, Path::new("/home/me/Music/../Documents")),
        Err(FolderNotifyError::DuplicatePath(ref p)) if p == docs
    ));
    assert!(edit::set_active(&mut cfg, Path::new("/home/me/./Documents"), false)?);
    assert!(edit::set_excluded(&mut cfg, docs, Path::new("cache/../tmp"), true)?);
    assert_eq!(cfg.folders[0].excluded_subpaths, vec![docs.join("tmp")]);

    // `..` cannot climb out of the folder.
    assert!(matches!(
        edit::set_excluded(&mut cfg, docs, Path::new("../Music"), true),
        Err(FolderNotifyError::ConfigError(_))
    ));
    assert!(matches!(
        edit::set_excluded(&mut cfg, docs, Path::new("tmp/.."), true),
        Err(FolderNotifyError::ConfigError(_))
    ));

    let removed = edit::remove_folder(&mut cfg, Path::new("/home/me/Documents/tmp/.."))?;
    assert_eq!(removed.path, docs);
    Ok(())
}

#[test]
fn offline_edits_follow_registry_rules() -> TestResult {
    let mut cfg = ConfigFile::default();
    let docs = Path::new("/home/me/Documents");

    edit::add_folder(&mut cfg, docs)?;
    assert!(matches!(
        edit::add_folder(&mut cfg, docs),
        Err(FolderNotifyError::DuplicatePath(_))
    ));

    assert!(edit::set_active(&mut cfg, docs, false)?);
    assert!(!edit::set_active(&mut cfg, docs, false)?);

    assert!(edit::set_excluded(&mut cfg, docs, Path::new("tmp"), true)?);
    assert!(!edit::set_excluded(&mut cfg, docs, Path::new("/home/me/Documents/tmp"), true)?);
    assert!(matches!(
        edit::set_excluded(&mut cfg, docs, Path::new("/etc"), true),
        Err(FolderNotifyError::ConfigError(_))
    ));
    assert!(matches!(
        edit::set_excluded(&mut cfg, docs, docs, true),
        Err(FolderNotifyError::ConfigError(_))
    ));
    assert!(edit::set_excluded(&mut cfg, docs, Path::new("tmp"), false)?);

    let removed = edit::remove_folder(&mut cfg, docs)?;
    assert_eq!(removed.path, docs);
    assert!(matches!(
        edit::remove_folder(&mut cfg, docs),
        Err(FolderNotifyError::UnknownFolder(_))
    ));
    Ok(())
}
