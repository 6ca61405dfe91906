//! Generation history persisted through a key-value store.

use async_trait::async_trait;
use fitify_core::Result;
use fitify_core::cache::{GeneratedImage, GenerationRepository};
use fitify_core::storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Key holding the JSON array of [`GeneratedImage`] records.
pub const GENERATED_IMAGES_KEY: &str = "fitify_generated_images";

/// Stores the whole history as one JSON document, oldest record first.
///
/// Only the most recent `limit` records are kept; a limit of 0 keeps
/// everything. A document that fails to parse is treated as empty and is
/// overwritten by the next append.
pub struct KeyValueGenerationRepository {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl KeyValueGenerationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            store,
            limit,
            write_lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<Vec<GeneratedImage>> {
        let Some(document) = self.store.get(GENERATED_IMAGES_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&document) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!("Discarding unreadable generation history: {}", err);
                Ok(Vec::new())
            }
        }
    }

    async fn write(&self, records: &[GeneratedImage]) -> Result<()> {
        let document = serde_json::to_string(records)?;
        self.store.set(GENERATED_IMAGES_KEY, document).await
    }
}

#[async_trait]
impl GenerationRepository for KeyValueGenerationRepository {
    async fn load_all(&self) -> Result<Vec<GeneratedImage>> {
        self.read().await
    }

    async fn append(&self, record: GeneratedImage) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read().await?;
        records.push(record);
        if self.limit > 0 && records.len() > self.limit {
            let excess = records.len() - self.limit;
            records.drain(..excess);
            debug!(excess, "Trimmed generation history");
        }
        self.write(&records).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read().await?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write(&records).await?;
        Ok(true)
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.delete(GENERATED_IMAGES_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore};
    use fitify_core::cache::NewGeneratedImage;
    use fitify_core::image::{ImageIdentity, ImageRef};
    use fitify_core::pose::Pose;
    use tempfile::TempDir;

    fn record(image: &str) -> GeneratedImage {
        NewGeneratedImage {
            base_identity: ImageIdentity::from_content(b"me"),
            model_image: ImageRef::new("model"),
            garment_id: Some("polo".into()),
            garment_name: Some("Polo".into()),
            generated_image: ImageRef::new(image),
            pose: Some(Pose::new("front")),
        }
        .into_record()
    }

    fn images(records: &[GeneratedImage]) -> Vec<&str> {
        records.iter().map(|r| r.generated_image.as_str()).collect()
    }

    #[tokio::test]
    async fn test_append_keeps_most_recent() {
        let repo = KeyValueGenerationRepository::new(Arc::new(InMemoryKeyValueStore::new()), 2);
        for image in ["a", "b", "c"] {
            repo.append(record(image)).await.unwrap();
        }

        let records = repo.load_all().await.unwrap();
        assert_eq!(images(&records), vec!["b", "c"]);
        assert_eq!(repo.most_recent().await.unwrap().unwrap().generated_image.as_str(), "c");
    }

    #[tokio::test]
    async fn test_zero_limit_keeps_everything() {
        let repo = KeyValueGenerationRepository::new(Arc::new(InMemoryKeyValueStore::new()), 0);
        for image in ["a", "b", "c"] {
            repo.append(record(image)).await.unwrap();
        }
        assert_eq!(repo.load_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let repo = KeyValueGenerationRepository::new(Arc::new(InMemoryKeyValueStore::new()), 10);
        let first = record("a");
        let id = first.id.clone();
        repo.append(first).await.unwrap();
        repo.append(record("b")).await.unwrap();

        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.delete(&id).await.unwrap());
        assert_eq!(images(&repo.load_all().await.unwrap()), vec!["b"]);

        repo.clear().await.unwrap();
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_document_is_replaced() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store
            .set(GENERATED_IMAGES_KEY, "not json".to_string())
            .await
            .unwrap();
        let repo = KeyValueGenerationRepository::new(store, 10);

        assert!(repo.load_all().await.unwrap().is_empty());
        repo.append(record("a")).await.unwrap();
        assert_eq!(images(&repo.load_all().await.unwrap()), vec!["a"]);
    }

    #[tokio::test]
    async fn test_history_survives_reopen_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let original = record("a");
        {
            let store = Arc::new(FileKeyValueStore::new(temp_dir.path().to_path_buf()));
            let repo = KeyValueGenerationRepository::new(store, 10);
            repo.append(original.clone()).await.unwrap();
        }

        let store = Arc::new(FileKeyValueStore::new(temp_dir.path().to_path_buf()));
        let repo = KeyValueGenerationRepository::new(store, 10);
        let records = repo.load_all().await.unwrap();
        assert_eq!(records, vec![original.clone()]);
        assert_eq!(records[0].cache_key(), original.cache_key());
    }
}
