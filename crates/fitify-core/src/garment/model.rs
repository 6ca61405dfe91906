//! Garment references and upload validation.

use crate::error::Result;
use crate::image::{self, ImageRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a wearable item. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentRef {
    /// Stable id, unique within a wardrobe.
    pub id: String,
    pub display_name: String,
    /// Location of the garment image.
    pub source_locator: ImageRef,
}

impl GarmentRef {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        source_locator: impl Into<ImageRef>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            source_locator: source_locator.into(),
        }
    }
}

/// A garment file picked by the user, before it is accepted into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarmentUpload {
    pub file_name: String,
    /// Declared MIME type, if the picker reported one.
    pub mime_type: Option<String>,
    pub locator: ImageRef,
}

impl GarmentUpload {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: Option<String>,
        locator: impl Into<ImageRef>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            locator: locator.into(),
        }
    }

    /// The declared MIME type, or one guessed from the file extension.
    pub fn effective_mime_type(&self) -> Option<String> {
        image::effective_mime_type(&self.file_name, self.mime_type.as_deref())
    }

    /// Rejects anything that is not an image.
    pub fn validate(&self) -> Result<()> {
        image::ensure_image(&self.file_name, self.mime_type.as_deref())
    }

    /// Validates the upload and turns it into a garment reference.
    ///
    /// Every upload gets its own id, even when file names repeat, so the
    /// cache never serves one upload's render for another.
    pub fn into_garment(self) -> Result<GarmentRef> {
        self.validate()?;
        let stem = std::path::Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file_name.clone());
        let id = format!("custom-{}-{}", slugify(&stem), Uuid::new_v4().simple());
        Ok(GarmentRef::new(id, stem, self.locator))
    }
}

fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}
