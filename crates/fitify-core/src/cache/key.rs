use crate::image::ImageIdentity;
use crate::pose::Pose;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one memoized generation result.
///
/// Equality is exact on all three components; no normalization happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub base: ImageIdentity,
    pub garment_id: Option<String>,
    pub pose: Option<Pose>,
}

impl CacheKey {
    pub fn new(base: ImageIdentity, garment_id: Option<&str>, pose: Option<&Pose>) -> Self {
        Self {
            base,
            garment_id: garment_id.map(str::to_string),
            pose: pose.cloned(),
        }
    }

    /// Key of a garment render in a given pose.
    pub fn garment(base: ImageIdentity, garment_id: &str, pose: &Pose) -> Self {
        Self::new(base, Some(garment_id), Some(pose))
    }

    /// Key of the initial model transform (no garment, no pose).
    pub fn transform(base: ImageIdentity) -> Self {
        Self::new(base, None, None)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.base,
            self.garment_id.as_deref().unwrap_or("base"),
            self.pose.as_ref().map(Pose::instruction).unwrap_or("default")
        )
    }
}
