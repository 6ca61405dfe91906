//! The personal wardrobe: an append-only garment list de-duplicated by id.

use super::model::GarmentRef;
use serde::{Deserialize, Serialize};

/// Builds the default wardrobe, with images hosted under `media_url`.
pub fn default_wardrobe(media_url: &str) -> Wardrobe {
    let media = |file: &str| match media_url.trim_end_matches('/') {
        "" => file.to_string(),
        base => format!("{base}/{file}"),
    };
    Wardrobe::from_items(vec![
        GarmentRef::new("polo-tripping", "Polo (Tripping)", media("polo1.jpg")),
        GarmentRef::new("sweat-shirt", "Sweat Shirt", media("sweat1.jpg")),
    ])
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wardrobe {
    items: Vec<GarmentRef>,
}

impl Wardrobe {
    /// Builds a wardrobe, keeping the first occurrence of each id.
    pub fn from_items(items: Vec<GarmentRef>) -> Self {
        let mut wardrobe = Self::default();
        for item in items {
            wardrobe.add_if_absent(item);
        }
        wardrobe
    }

    pub fn items(&self) -> &[GarmentRef] {
        &self.items
    }

    pub fn contains(&self, garment_id: &str) -> bool {
        self.items.iter().any(|g| g.id == garment_id)
    }

    pub fn get(&self, garment_id: &str) -> Option<&GarmentRef> {
        self.items.iter().find(|g| g.id == garment_id)
    }

    /// Appends the garment unless one with the same id is already present.
    ///
    /// Returns true when the garment was added.
    pub fn add_if_absent(&mut self, garment: GarmentRef) -> bool {
        if self.contains(&garment.id) {
            return false;
        }
        self.items.push(garment);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wardrobe_uses_media_url() {
        let wardrobe = default_wardrobe("https://media.example.com/");
        assert_eq!(wardrobe.len(), 2);
        assert_eq!(
            wardrobe.get("sweat-shirt").unwrap().source_locator.as_str(),
            "https://media.example.com/sweat1.jpg"
        );
    }

    #[test]
    fn test_add_is_idempotent_by_id() {
        let mut wardrobe = Wardrobe::default();
        assert!(wardrobe.add_if_absent(GarmentRef::new("g1", "Jacket", "a.jpg")));
        assert!(!wardrobe.add_if_absent(GarmentRef::new("g1", "Jacket v2", "b.jpg")));
        assert_eq!(wardrobe.len(), 1);
        assert_eq!(wardrobe.get("g1").unwrap().display_name, "Jacket");
    }
}
