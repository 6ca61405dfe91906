use super::key::CacheKey;
use crate::image::{ImageIdentity, ImageRef};
use crate::pose::Pose;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted record of one successful generation.
///
/// The generation history doubles as the persisted form of the cache and as
/// the data behind the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    /// Identity of the untransformed upload the render descends from.
    pub base_identity: ImageIdentity,
    /// The image the generator was given as its base.
    pub model_image: ImageRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub garment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub garment_name: Option<String>,
    pub generated_image: ImageRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedImage {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.base_identity, self.garment_id.as_deref(), self.pose.as_ref())
    }
}

/// The fields of a [`GeneratedImage`] supplied by the caller; id and
/// timestamp are assigned on [`NewGeneratedImage::into_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGeneratedImage {
    pub base_identity: ImageIdentity,
    pub model_image: ImageRef,
    pub garment_id: Option<String>,
    pub garment_name: Option<String>,
    pub generated_image: ImageRef,
    pub pose: Option<Pose>,
}

impl NewGeneratedImage {
    pub fn into_record(self) -> GeneratedImage {
        GeneratedImage {
            id: format!("img_{}", Uuid::new_v4().simple()),
            base_identity: self.base_identity,
            model_image: self.model_image,
            garment_id: self.garment_id,
            garment_name: self.garment_name,
            generated_image: self.generated_image,
            pose: self.pose,
            created_at: Utc::now(),
        }
    }
}
