//! # Storage Layer
//!
//! The whole plant collection lives in one JSON document. Every operation
//! reads it fresh and every mutating operation rewrites it completely; there
//! is no in-memory cache and no partial update.
//!
//! ## Split
//!
//! - [`backend::StorageBackend`]: the "how" (filesystem vs memory). Moves raw
//!   text and provides the exclusive lock.
//! - [`RecordStore`]: the "what". Parses, normalizes and serializes the
//!   [`Collection`], and owns the corrupt-document policy.
//!
//! ## Corrupt Documents
//!
//! A document that does not parse is treated as an empty collection and
//! logged, never surfaced as an error. The next save overwrites it. I/O
//! failures (permissions, disk full) are still returned to the caller.
//!
//! ## Locking
//!
//! Mutating commands hold [`RecordStore::lock`] for their whole
//! load-modify-save cycle, so two concurrent invocations cannot lose each
//! other's update. Reads do not lock: the atomic rename in
//! [`fs_backend::FsBackend`] means a reader sees either the old or the new
//! document, never a truncated one.
//!
//! ## Storage Layout
//!
//! ```text
//! <home>/
//! ├── config.json
//! ├── data/
//! │   ├── plants.json        # {"1": {"last_watered": ..., "name": ..., "image_path": ...}}
//! │   └── plants.json.lock   # advisory lock file
//! └── static/
//!     └── plant_images/      # uploaded photos
//! ```

use crate::error::Result;
use crate::model::{Collection, PlantId, PlantRecord};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::{StorageBackend, StoreLock};

pub type FileStore = RecordStore<fs_backend::FsBackend>;
pub type InMemoryStore = RecordStore<mem_backend::MemBackend>;

pub struct RecordStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the full collection.
    ///
    /// Missing, empty, `null` and unparseable documents all yield an empty
    /// collection. Entries whose key is not a plant id, or whose body is not
    /// a plant record, are dropped one by one; the rest still load.
    pub fn load(&self) -> Result<Collection> {
        let Some(content) = self.backend.read_document()? else {
            debug!("no plant document yet, starting empty");
            return Ok(Collection::new());
        };

        if content.trim().is_empty() {
            return Ok(Collection::new());
        }

        let raw: Option<BTreeMap<String, Value>> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    path = %self.backend.location().display(),
                    error = %e,
                    "plant document is corrupt, treating it as empty"
                );
                return Ok(Collection::new());
            }
        };

        let mut plants = Collection::new();
        for (key, value) in raw.unwrap_or_default() {
            let Ok(id) = key.parse::<PlantId>() else {
                warn!(key = %key, "skipping plant entry with a non-numeric id");
                continue;
            };
            match serde_json::from_value::<PlantRecord>(value) {
                Ok(mut record) => {
                    record.normalize(id);
                    plants.insert(id, record);
                }
                Err(e) => warn!(plant = %id, error = %e, "skipping malformed plant entry"),
            }
        }
        debug!(count = plants.len(), "loaded plants");
        Ok(plants)
    }

    /// Serialize and persist the full collection, replacing what was there.
    pub fn save(&self, plants: &Collection) -> Result<()> {
        let content = serde_json::to_string_pretty(plants)?;
        self.backend.write_document(&content)
    }

    /// Take the exclusive lock for a load-modify-save cycle.
    pub fn lock(&self) -> Result<StoreLock> {
        self.backend.lock()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_backend(mem_backend::MemBackend::new())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self::with_backend(fs_backend::FsBackend::new(data_file))
    }
}
