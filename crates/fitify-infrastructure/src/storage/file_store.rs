//! Key-value store backed by one file per key.

use super::atomic_file::AtomicFile;
use async_trait::async_trait;
use fitify_core::storage::KeyValueStore;
use fitify_core::{FitifyError, Result};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::debug;

/// Persists each key as `<dir>/<encoded key>.json`.
///
/// Keys are encoded so that any string maps to a distinct, safe file name.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        if key.is_empty() {
            return Err(FitifyError::invalid_input("storage key must not be empty"));
        }
        Ok(AtomicFile::new(self.dir.join(format!("{}.json", encode_key(key)))))
    }
}

/// Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| FitifyError::internal(format!("storage task failed: {e}")))?
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        run_blocking(move || Ok(file.read()?)).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let file = self.file_for(key)?;
        debug!(key, bytes = value.len(), "Writing key");
        run_blocking(move || Ok(file.update(|_| Some(value))?)).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let file = self.file_for(key)?;
        run_blocking(move || Ok(file.update(|_| None)?)).await
    }
}
