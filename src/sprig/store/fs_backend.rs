use super::backend::{StorageBackend, StoreLock};
use crate::error::{Result, SprigError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Stores the plant document as a single JSON file.
pub struct FsBackend {
    data_file: PathBuf,
}

impl FsBackend {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.data_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .data_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "plants.json".into());
        name.push(".lock");
        self.data_dir().join(name)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(SprigError::Io)?;
        }
        Ok(())
    }

    fn open_lock_file(&self) -> Result<File> {
        self.ensure_dir(&self.data_dir())?;
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(SprigError::Io)
    }

    /// Non-blocking variant of [`StorageBackend::lock`]: `Ok(None)` when
    /// another handle currently holds the lock.
    pub fn try_lock(&self) -> Result<Option<StoreLock>> {
        let file = self.open_lock_file()?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(StoreLock::from_file(file))),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(SprigError::Io(e)),
        }
    }
}

impl StorageBackend for FsBackend {
    fn read_document(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.data_file) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SprigError::Io(e)),
        }
    }

    fn write_document(&self, content: &str) -> Result<()> {
        let dir = self.data_dir();
        self.ensure_dir(&dir)?;

        let tmp_file = dir.join(format!(".plants-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(SprigError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.data_file) {
            let _ = fs::remove_file(&tmp_file);
            return Err(SprigError::Io(e));
        }
        debug!(path = %self.data_file.display(), bytes = content.len(), "wrote plant document");
        Ok(())
    }

    fn lock(&self) -> Result<StoreLock> {
        let file = self.open_lock_file()?;
        file.lock_exclusive().map_err(SprigError::Io)?;
        Ok(StoreLock::from_file(file))
    }

    fn location(&self) -> PathBuf {
        self.data_file.clone()
    }
}
