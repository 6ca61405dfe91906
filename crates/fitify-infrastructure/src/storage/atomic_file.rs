//! Atomic text file operations.
//!
//! Writes go to a temporary file in the same directory, are synced, and are
//! then renamed over the target. Read-modify-write cycles hold an exclusive
//! `fs2` lock on a sibling `.lock` file.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// Errors that can occur during atomic file operations.
#[derive(Debug)]
pub enum AtomicFileError {
    /// File I/O error.
    IoError(std::io::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicFileError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicFileError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicFileError {}

impl From<std::io::Error> for AtomicFileError {
    fn from(e: std::io::Error) -> Self {
        AtomicFileError::IoError(e)
    }
}

impl From<AtomicFileError> for fitify_core::FitifyError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::IoError(e) => e.into(),
            AtomicFileError::LockError(message) => fitify_core::FitifyError::data_access(message),
        }
    }
}

/// A handle to a text file that is replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, or `None` if it does not exist.
    pub fn read(&self) -> Result<Option<String>, AtomicFileError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the file content with `content`.
    pub fn write(&self, content: &str) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Deletes the file. A missing file is not an error.
    pub fn remove(&self) -> Result<(), AtomicFileError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Runs `f` on the current content under an exclusive lock.
    ///
    /// `Some` writes the returned content back, `None` deletes the file.
    pub fn update<F>(&self, f: F) -> Result<(), AtomicFileError>
    where
        F: FnOnce(Option<String>) -> Option<String>,
    {
        let _lock = FileLock::acquire(&self.path)?;
        match f(self.read()?) {
            Some(content) => self.write(&content),
            None => self.remove(),
        }
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let parent = self.path.parent().ok_or_else(|| {
            AtomicFileError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;
        let file_name = self.path.file_name().ok_or_else(|| {
            AtomicFileError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;
        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock released on drop.
struct FileLock {
    _file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicFileError::LockError(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock {
            _file: file,
            lock_path,
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // best effort
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("nested").join("value.json"));

        assert!(file.read().unwrap().is_none());
        file.write("[1,2,3]").unwrap();
        assert_eq!(file.read().unwrap().as_deref(), Some("[1,2,3]"));

        // no temp file left behind
        assert!(!temp_dir.path().join("nested").join(".value.json.tmp").exists());
    }

    #[test]
    fn test_update_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::new(temp_dir.path().join("counter"));

        file.update(|current| {
            assert!(current.is_none());
            Some("1".to_string())
        })
        .unwrap();
        file.update(|current| {
            let n: u32 = current.unwrap().parse().unwrap();
            Some((n + 1).to_string())
        })
        .unwrap();
        assert_eq!(file.read().unwrap().as_deref(), Some("2"));
        assert!(!temp_dir.path().join("counter.lock").exists());

        file.update(|_| None).unwrap();
        assert!(file.read().unwrap().is_none());
        file.remove().unwrap();
    }
}
