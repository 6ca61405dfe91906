//! Generation history repository trait.

use super::record::GeneratedImage;
use crate::error::Result;
use crate::image::ImageIdentity;
use async_trait::async_trait;

/// Persistence for the generation history.
///
/// Implementations decide how many records to retain; callers must not assume
/// that every appended record can be read back.
#[async_trait]
pub trait GenerationRepository: Send + Sync {
    /// Returns all retained records, oldest first.
    async fn load_all(&self) -> Result<Vec<GeneratedImage>>;

    /// Appends a record.
    async fn append(&self, record: GeneratedImage) -> Result<()>;

    /// Deletes a record by id.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the record existed and was removed
    /// - `Ok(false)`: no record with that id
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Removes every record.
    async fn clear(&self) -> Result<()>;

    /// Records generated from a given upload, oldest first.
    async fn find_by_base(&self, base: ImageIdentity) -> Result<Vec<GeneratedImage>> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .filter(|r| r.base_identity == base)
            .collect())
    }

    /// The most recently appended record still retained.
    async fn most_recent(&self) -> Result<Option<GeneratedImage>> {
        Ok(self.load_all().await?.pop())
    }
}
