//! Gallery of previously generated images.

use fitify_core::Result;
use fitify_core::cache::{GeneratedImage, GenerationRepository};
use fitify_core::image::ImageIdentity;
use std::sync::Arc;
use tracing::info;

/// Read and housekeeping access to the generation history.
///
/// Deleting records here does not evict them from a running dispatcher's
/// cache; they disappear from the cache on the next session restore.
pub struct GalleryService {
    repository: Arc<dyn GenerationRepository>,
}

impl GalleryService {
    pub fn new(repository: Arc<dyn GenerationRepository>) -> Self {
        Self { repository }
    }

    /// All retained images, newest first.
    pub async fn all_images(&self) -> Result<Vec<GeneratedImage>> {
        let mut images = self.repository.load_all().await?;
        images.reverse();
        Ok(images)
    }

    /// Images generated from one upload, newest first.
    pub async fn images_for(&self, base: ImageIdentity) -> Result<Vec<GeneratedImage>> {
        let mut images = self.repository.find_by_base(base).await?;
        images.reverse();
        Ok(images)
    }

    pub async fn most_recent(&self) -> Result<Option<GeneratedImage>> {
        self.repository.most_recent().await
    }

    /// Returns true if an image with `id` existed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.repository.delete(id).await?;
        if removed {
            info!(id, "Deleted generated image");
        }
        Ok(removed)
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.repository.clear().await?;
        info!("Cleared generation history");
        Ok(())
    }
}
