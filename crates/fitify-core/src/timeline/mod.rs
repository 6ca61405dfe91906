//! Outfit timeline module.
//!
//! - `layer`: one garment application plus its per-pose renders (`Layer`, `PoseImages`)
//! - `history`: the cursor-addressed layer history (`Timeline`)

mod layer;
mod history;

pub use layer::{Layer, PoseImages};
pub use history::Timeline;
