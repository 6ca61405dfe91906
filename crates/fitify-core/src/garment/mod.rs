//! Garment domain module.
//!
//! - `model`: garment references and upload validation (`GarmentRef`, `GarmentUpload`)
//! - `wardrobe`: the personal garment collection (`Wardrobe`)

mod model;
mod wardrobe;

pub use model::{GarmentRef, GarmentUpload};
pub use wardrobe::{Wardrobe, default_wardrobe};
