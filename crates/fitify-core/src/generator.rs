//! The image-generation collaborator contract.

use crate::image::ImageRef;
use crate::pose::Pose;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a generation failure should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationErrorKind {
    /// The user has no credit left.
    InsufficientCredit,
    /// Anything else: transport failure, policy rejection, malformed response.
    Generic,
}

/// A failed generator call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn insufficient_credit(message: impl Into<String>) -> Self {
        Self {
            kind: GenerationErrorKind::InsufficientCredit,
            message: message.into(),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            kind: GenerationErrorKind::Generic,
            message: message.into(),
        }
    }

    pub fn is_insufficient_credit(&self) -> bool {
        self.kind == GenerationErrorKind::InsufficientCredit
    }
}

/// The external image generator.
///
/// Each successful call consumes one credit on the external ledger; the core
/// never debits on its own.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Turns a raw upload into a clean model image.
    async fn transform(&self, raw_image: &ImageRef) -> Result<ImageRef, GenerationError>;

    /// Renders `base_image` wearing the garment shown in `garment_image`.
    async fn apply_garment(
        &self,
        base_image: &ImageRef,
        garment_image: &ImageRef,
    ) -> Result<ImageRef, GenerationError>;

    /// Re-renders `base_image` in the given pose.
    async fn change_pose(
        &self,
        base_image: &ImageRef,
        pose: &Pose,
    ) -> Result<ImageRef, GenerationError>;
}
