use crate::error::Result;
use std::fs::File;
use std::path::PathBuf;

/// Raw I/O for the plant data document.
///
/// The backend only moves text in and out; parsing, defaults and the
/// corrupt-document policy live in [`super::RecordStore`].
pub trait StorageBackend {
    /// Read the whole document. `Ok(None)` when it has never been written.
    fn read_document(&self) -> Result<Option<String>>;

    /// Replace the whole document.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid truncated files.
    fn write_document(&self, content: &str) -> Result<()>;

    /// Take the exclusive lock that serializes read-modify-write cycles.
    /// Blocks until it is available; released when the guard drops.
    fn lock(&self) -> Result<StoreLock>;

    /// Where the document lives, for log messages.
    fn location(&self) -> PathBuf;
}

/// Guard for the store's exclusive lock.
///
/// Dropping it releases the lock, so early returns and `?` propagation
/// always unlock.
#[derive(Debug)]
pub struct StoreLock {
    file: Option<File>,
}

impl StoreLock {
    /// A guard that holds nothing, for backends with no cross-process state.
    pub fn unlocked() -> Self {
        Self { file: None }
    }

    pub(crate) fn from_file(file: File) -> Self {
        Self { file: Some(file) }
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            // closing the handle releases the lock as well
            let _ = fs2::FileExt::unlock(&file);
        }
    }
}
