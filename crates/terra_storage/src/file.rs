//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file-based storage backend.
///
/// The blob lives in a single file. Every `store` writes a sibling
/// `<name>.tmp` file, flushes it and renames it over the target, so a crash
/// mid-write leaves either the previous file or the new one, never a torn mix.
///
/// # Durability
///
/// - With sync enabled (the default), the temp file is `sync_all`ed before
///   the rename
/// - With sync disabled, data is only flushed to the OS
///
/// # Example
///
/// ```no_run
/// use terra_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("catalog.snapshot")).unwrap();
/// backend.store(b"persistent data").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    tmp_path: PathBuf,
    sync: bool,
    // Serializes writers sharing this handle.
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The file itself is not created until the first `store`. A stale temp
    /// file left by an interrupted write is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name or a stale temp file
    /// cannot be removed.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;

        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        match fs::remove_file(&tmp_path) {
            Ok(()) => debug!(path = %tmp_path.display(), "removed stale temp file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            path: path.to_path_buf(),
            tmp_path,
            sync: true,
            write_lock: Mutex::new(()),
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the path is invalid.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Sets whether each `store` is synced to disk before the rename.
    #[must_use]
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&mut self, data: &[u8]) -> StorageResult<()> {
        let _guard = self.write_lock.lock();

        let write_tmp = || -> StorageResult<()> {
            let mut file: File = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.tmp_path)?;
            file.write_all(data)?;
            file.flush()?;
            if self.sync {
                file.sync_all()?;
            }
            Ok(())
        };

        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&self.tmp_path);
            return Err(e);
        }

        fs::rename(&self.tmp_path, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn size(&self) -> StorageResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
