//! Image references and stable image identities.

use crate::error::{FitifyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Namespace for content-derived image identities.
const IMAGE_NAMESPACE: Uuid = Uuid::from_u128(0x6a0f_55c1_2b7e_4c1d_9e3a_8f41_d2b6_07e9);

/// A locator for a rendered or uploaded image (URL, data URL or local path).
///
/// Locators are opaque to the core; only the transport collaborator resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for `data:` URLs, which carry their bytes inline.
    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Returns true for `http://` and `https://` locators.
    pub fn is_remote(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Stable identity of an uploaded image, used as the base component of cache keys.
///
/// Blob-style locators are session-local and may be revoked or reused, so the
/// identity is derived from the image content (or assigned once) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageIdentity(Uuid);

impl ImageIdentity {
    /// Derives the identity from the raw image bytes.
    ///
    /// Identical content always yields the same identity.
    pub fn from_content(bytes: &[u8]) -> Self {
        Self(Uuid::new_v5(&IMAGE_NAMESPACE, bytes))
    }

    /// Assigns a fresh random identity, for uploads whose bytes are not at hand.
    pub fn assign() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ImageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ImageIdentity {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// An uploaded image together with its stable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    pub image: ImageRef,
    pub identity: ImageIdentity,
}

impl SourceImage {
    pub fn new(image: impl Into<ImageRef>, identity: ImageIdentity) -> Self {
        Self {
            image: image.into(),
            identity,
        }
    }
}

/// The declared MIME type, or one guessed from the file name.
pub fn effective_mime_type(file_name: &str, declared: Option<&str>) -> Option<String> {
    declared
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .or_else(|| {
            mime_guess::from_path(file_name)
                .first()
                .map(|m| m.essence_str().to_string())
        })
}

/// Rejects files that are not `image/*`.
pub fn ensure_image(file_name: &str, declared: Option<&str>) -> Result<()> {
    match effective_mime_type(file_name, declared) {
        Some(mime) if mime.starts_with("image/") => Ok(()),
        Some(mime) => Err(FitifyError::invalid_input(format!(
            "'{file_name}' is not an image ({mime})"
        ))),
        None => Err(FitifyError::invalid_input(format!(
            "Cannot determine the type of '{file_name}'"
        ))),
    }
}
