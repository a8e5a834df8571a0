//! # Command Layer
//!
//! This module contains the **core business logic** of sprig. Each command lives in its
//! own submodule and implements pure Rust functions over a [`RecordStore`].
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Load the collection, apply the change, save it back
//! - Enforce id generation and field defaults
//! - Return structured `CmdResult` with affected plants and messages
//! - Are completely UI-agnostic
//!
//! ## Read-Modify-Write
//!
//! Every mutating command follows the same shape:
//!
//! ```text
//! lock → load → mutate → save (only if something changed) → unlock
//! ```
//!
//! The lock guard is a local binding, so it is released on every return path.
//!
//! ## Unknown Ids
//!
//! Acting on a plant that does not exist is not an error. The command
//! returns an ordinary `CmdResult` with an info message and leaves the data
//! file untouched. Clients that care can check `affected_plants`.
//!
//! ## Dates
//!
//! Commands never read the clock. Callers pass `today`, which keeps every
//! command deterministic under test.
//!
//! ## Command Modules
//!
//! - [`create`]: Register a new plant
//! - [`water`]: Record a watering
//! - [`rename`]: Change a plant's name
//! - [`set_image`]: Attach or replace a plant's photo
//! - [`delete`]: Remove a plant and its photo
//! - [`list`]: All plants with derived fields
//! - [`status`]: One plant with derived fields
//! - [`labels`]: Printable label sheets
//! - [`config`]: Show and change configuration
//! - [`paths`]: Where sprig keeps its files

use crate::error::{Result, SprigError};
use crate::images::IMAGES_DIR;
use crate::labels::LabelSheet;
use crate::view::PlantView;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub mod config;
pub mod create;
pub mod delete;
pub mod labels;
pub mod list;
pub mod paths;
pub mod rename;
pub mod set_image;
pub mod status;
pub mod water;

/// Filesystem locations, all derived from one home directory.
#[derive(Debug, Clone, Serialize)]
pub struct SprigPaths {
    pub home: PathBuf,
    pub data_file: PathBuf,
    pub static_root: PathBuf,
    pub config_dir: PathBuf,
}

impl SprigPaths {
    pub fn from_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref().to_path_buf();
        Self {
            data_file: home.join("data").join("plants.json"),
            static_root: home.join("static"),
            config_dir: home.clone(),
            home,
        }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.static_root.join(IMAGES_DIR)
    }

    /// Create the data and image directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        let data_dir = self
            .data_file
            .parent()
            .ok_or_else(|| SprigError::Store("data file has no parent directory".into()))?;
        for dir in [data_dir.to_path_buf(), self.images_dir()] {
            if !dir.exists() {
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One configuration value as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedPath {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    /// Plants changed by the command, as they look afterwards.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affected_plants: Vec<PlantView>,
    /// Plants to display (list/status).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub listed_plants: Vec<PlantView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelSheet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<Setting>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<NamedPath>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_plants(mut self, plants: Vec<PlantView>) -> Self {
        self.listed_plants = plants;
        self
    }

    pub fn with_labels(mut self, labels: LabelSheet) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_settings(mut self, settings: Vec<Setting>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_paths(mut self, paths: Vec<NamedPath>) -> Self {
        self.paths = paths;
        self
    }

    /// Result for a command aimed at a plant that does not exist.
    pub fn unknown_plant(id: impl std::fmt::Display) -> Self {
        let mut result = Self::default();
        result.add_message(CmdMessage::info(format!("No plant with id {}", id)));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_derive_from_home() {
        let paths = SprigPaths::from_home("/srv/sprig");
        assert_eq!(paths.data_file, PathBuf::from("/srv/sprig/data/plants.json"));
        assert_eq!(paths.static_root, PathBuf::from("/srv/sprig/static"));
        assert_eq!(
            paths.images_dir(),
            PathBuf::from("/srv/sprig/static/plant_images")
        );
        assert_eq!(paths.config_dir, PathBuf::from("/srv/sprig"));
    }

    #[test]
    fn ensure_dirs_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let paths = SprigPaths::from_home(dir.path().join("home"));
        paths.ensure_dirs().unwrap();
        assert!(paths.data_file.parent().unwrap().is_dir());
        assert!(paths.images_dir().is_dir());
        // idempotent
        paths.ensure_dirs().unwrap();
    }

    #[test]
    fn unknown_plant_result_is_informational() {
        let result = CmdResult::unknown_plant("9");
        assert!(result.affected_plants.is_empty());
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Info);
        assert!(result.messages[0].content.contains('9'));
    }
}
