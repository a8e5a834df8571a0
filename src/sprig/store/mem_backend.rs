use super::backend::{StorageBackend, StoreLock};
use crate::error::{Result, SprigError};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since sprig is single-threaded,
/// which lets the `StorageBackend` trait take `&self` everywhere.
#[derive(Default)]
pub struct MemBackend {
    document: RefCell<Option<String>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with a raw document, e.g. a corrupt one.
    pub fn with_document(content: impl Into<String>) -> Self {
        let backend = Self::default();
        *backend.document.borrow_mut() = Some(content.into());
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful `write_document` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn raw_document(&self) -> Option<String> {
        self.document.borrow().clone()
    }
}

impl StorageBackend for MemBackend {
    fn read_document(&self) -> Result<Option<String>> {
        Ok(self.document.borrow().clone())
    }

    fn write_document(&self, content: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(SprigError::Store("Simulated write error".to_string()));
        }
        *self.document.borrow_mut() = Some(content.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn lock(&self) -> Result<StoreLock> {
        Ok(StoreLock::unlocked())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://plants.json")
    }
}
