#![allow(dead_code)]

use std::path::{Path, PathBuf};

use foldernotify::config::{ConfigFile, FolderRecord, Settings};
use foldernotify::types::NotificationStyle;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: ConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
        }
    }

    pub fn coalesce_ms(mut self, ms: u64) -> Self {
        self.config.settings.coalesce_ms = ms;
        self
    }

    pub fn stop_timeout_ms(mut self, ms: u64) -> Self {
        self.config.settings.stop_timeout_ms = ms;
        self
    }

    pub fn style(mut self, style: NotificationStyle) -> Self {
        self.config.settings.style = style;
        self
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.config.settings.ignore.push(pattern.to_string());
        self
    }

    pub fn with_folder(mut self, folder: FolderRecord) -> Self {
        self.config.folders.push(folder);
        self
    }

    pub fn settings(&self) -> Settings {
        self.config.settings.clone()
    }

    pub fn build(self) -> ConfigFile {
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one `[[folder]]` record.
pub struct FolderRecordBuilder {
    record: FolderRecord,
}

impl FolderRecordBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            record: FolderRecord::new(path),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.name = Some(name.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.record.active = false;
        self
    }

    pub fn exclude(mut self, sub: impl AsRef<Path>) -> Self {
        let sub = self.record.path.join(sub);
        self.record.excluded_subpaths.push(sub);
        self
    }

    pub fn build(self) -> FolderRecord {
        self.record
    }
}
