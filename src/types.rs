use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Desired state of a watched folder.
///
/// This is what the user asked for, not necessarily what is running: an
/// `Active` folder whose monitor failed to start is reported as `Inactive`
/// by the registry until a later start succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderState {
    #[default]
    Active,
    Inactive,
}

impl FolderState {
    pub fn is_active(self) -> bool {
        matches!(self, FolderState::Active)
    }

    pub fn from_active(active: bool) -> Self {
        if active {
            FolderState::Active
        } else {
            FolderState::Inactive
        }
    }
}

impl fmt::Display for FolderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderState::Active => f.write_str("active"),
            FolderState::Inactive => f.write_str("inactive"),
        }
    }
}

/// How a flushed batch is turned into notifications.
///
/// - `Combined`: one notification per batch, listing every affected path
///   (default behaviour).
/// - `PerFile`: one notification per affected path, phrased after the kind of
///   change ("a.txt was created").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStyle {
    #[default]
    Combined,
    PerFile,
}

impl FromStr for NotificationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "combined" => Ok(NotificationStyle::Combined),
            "per_file" => Ok(NotificationStyle::PerFile),
            other => Err(format!(
                "invalid notification style: {other} (expected \"combined\" or \"per_file\")"
            )),
        }
    }
}
