//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all sprig operations, whichever client drives them.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (plant ids arrive as text and are parsed here)
//! - **Supplies context** the commands must not fetch themselves: today's
//!   date, the image directory, the optional optimizer, label settings
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Ids From Clients
//!
//! Ids come from URLs and command lines. Text that is not a plant id is
//! handled exactly like an id that does not exist: an info message and no
//! change.
//!
//! ## Generic Over StorageBackend
//!
//! `SprigApi<B: StorageBackend>` is generic over the storage backend:
//! - Production: `SprigApi<FsBackend>` (see [`SprigApi::open`])
//! - Testing: `SprigApi<MemBackend>`

use crate::commands;
use crate::config::SprigConfig;
use crate::error::Result;
use crate::images::{ImageAssets, Upload};
use crate::model::PlantId;
use crate::optimizer::ImageOptimizer;
use crate::store::fs_backend::FsBackend;
use crate::store::{RecordStore, StorageBackend};
use chrono::{Local, NaiveDate};
use tracing::debug;

/// The main API facade for sprig operations.
pub struct SprigApi<B: StorageBackend> {
    store: RecordStore<B>,
    assets: ImageAssets,
    optimizer: Option<Box<dyn ImageOptimizer>>,
    paths: commands::SprigPaths,
    config: SprigConfig,
    today: Option<NaiveDate>,
}

impl SprigApi<FsBackend> {
    /// API over the data file and image directory under `paths`.
    pub fn open(paths: commands::SprigPaths, config: SprigConfig) -> Self {
        let store = RecordStore::with_backend(FsBackend::new(&paths.data_file));
        Self::new(store, paths, config)
    }
}

impl<B: StorageBackend> SprigApi<B> {
    pub fn new(store: RecordStore<B>, paths: commands::SprigPaths, config: SprigConfig) -> Self {
        let assets = ImageAssets::new(&paths.static_root);
        Self {
            store,
            assets,
            optimizer: None,
            paths,
            config,
            today: None,
        }
    }

    pub fn with_optimizer(mut self, optimizer: Box<dyn ImageOptimizer>) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn create_plant(&self, name: Option<String>) -> Result<commands::CmdResult> {
        commands::create::run(&self.store, name, self.today())
    }

    pub fn water_plant(&self, id: &str, when: Option<NaiveDate>) -> Result<commands::CmdResult> {
        match resolve_id(id) {
            Some(id) => commands::water::run(&self.store, id, when, self.today()),
            None => Ok(commands::CmdResult::unknown_plant(id)),
        }
    }

    pub fn rename_plant(&self, id: &str, new_name: Option<&str>) -> Result<commands::CmdResult> {
        match resolve_id(id) {
            Some(id) => commands::rename::run(&self.store, id, new_name, self.today()),
            None => Ok(commands::CmdResult::unknown_plant(id)),
        }
    }

    pub fn set_plant_image(&self, id: &str, upload: Option<&Upload>) -> Result<commands::CmdResult> {
        match resolve_id(id) {
            Some(id) => commands::set_image::run(
                &self.store,
                &self.assets,
                self.optimizer.as_deref(),
                id,
                upload,
                self.today(),
            ),
            None => Ok(commands::CmdResult::unknown_plant(id)),
        }
    }

    pub fn delete_plant(&self, id: &str) -> Result<commands::CmdResult> {
        match resolve_id(id) {
            Some(id) => commands::delete::run(&self.store, &self.assets, id, self.today()),
            None => Ok(commands::CmdResult::unknown_plant(id)),
        }
    }

    pub fn list_plants(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, self.today())
    }

    pub fn plant_status(&self, id: &str) -> Result<commands::CmdResult> {
        match resolve_id(id) {
            Some(id) => commands::status::run(&self.store, id, self.today()),
            None => Ok(commands::CmdResult::unknown_plant(id)),
        }
    }

    /// Label sheets. `base_url` overrides the configured one.
    pub fn labels(&self, base_url: Option<&str>) -> Result<commands::CmdResult> {
        let base_url = match base_url {
            Some(url) => url.to_string(),
            None => self.config.label_base_url(),
        };
        commands::labels::run(
            &self.store,
            &base_url,
            self.config.labels.columns,
            self.config.labels.rows,
            self.today(),
        )
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn show_paths(&self) -> Result<commands::CmdResult> {
        commands::paths::run(&self.paths)
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn resolve_id(raw: &str) -> Option<PlantId> {
    match raw.trim().parse::<PlantId>() {
        Ok(id) => Some(id),
        Err(_) => {
            debug!(input = %raw, "not a plant id");
            None
        }
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel, NamedPath, Setting, SprigPaths};
