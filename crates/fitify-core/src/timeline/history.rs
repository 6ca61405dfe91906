use super::layer::Layer;
use crate::image::ImageRef;
use crate::pose::{Pose, PoseCatalog};

/// The outfit history: an ordered list of layers with a cursor.
///
/// `layers[0..=cursor]` is the outfit currently worn. Layers past the cursor
/// form a redo branch that survives until the next [`Timeline::append_layer`].
///
/// Invariants held after every call:
/// - `layers` is never empty and `cursor < layers.len()`
/// - `layers[0]` is the root layer (no garment)
#[derive(Debug, Clone)]
pub struct Timeline {
    poses: PoseCatalog,
    base_image: ImageRef,
    layers: Vec<Layer>,
    cursor: usize,
}

impl Timeline {
    /// Creates a timeline with a single root layer showing `base_image` in the
    /// catalog's default pose.
    pub fn new(poses: PoseCatalog, base_image: ImageRef) -> Self {
        let root = Layer::root(poses.default_pose().clone(), base_image.clone());
        Self {
            poses,
            base_image,
            layers: vec![root],
            cursor: 0,
        }
    }

    /// Resets to a single root layer, discarding all history.
    pub fn initialize(&mut self, base_image: ImageRef) {
        let root = Layer::root(self.poses.default_pose().clone(), base_image.clone());
        self.base_image = base_image;
        self.layers.clear();
        self.layers.push(root);
        self.cursor = 0;
    }

    pub fn poses(&self) -> &PoseCatalog {
        &self.poses
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The layers currently worn, root first.
    pub fn active_slice(&self) -> &[Layer] {
        &self.layers[..=self.cursor]
    }

    pub fn current_layer(&self) -> &Layer {
        &self.layers[self.cursor]
    }

    /// The image the timeline was initialized with.
    pub fn root_image(&self) -> &ImageRef {
        &self.base_image
    }

    /// The image to show for the cursor layer in the pose at `pose_index`.
    ///
    /// Falls back to the first image of the cursor layer when that pose has
    /// not been rendered yet, so the layer stays visible while it generates.
    pub fn display_image(&self, pose_index: usize) -> &ImageRef {
        let layer = self.current_layer();
        self.poses
            .get(pose_index)
            .and_then(|pose| layer.image_for(pose))
            .or_else(|| layer.any_image())
            .unwrap_or(&self.base_image)
    }

    /// Drops the redo branch, appends `layer` and moves the cursor onto it.
    pub fn append_layer(&mut self, layer: Layer) {
        self.layers.truncate(self.cursor + 1);
        self.layers.push(layer);
        self.cursor += 1;
    }

    /// Moves the cursor one layer back. No-op on the root.
    ///
    /// Returns true if the cursor moved.
    pub fn step_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// The first layer of the redo branch, if any.
    pub fn peek_next_layer(&self) -> Option<&Layer> {
        self.layers.get(self.cursor + 1)
    }

    /// Moves the cursor onto the existing next layer, keeping the branch.
    ///
    /// Returns true if the cursor moved.
    pub fn step_forward(&mut self) -> bool {
        if self.cursor + 1 >= self.layers.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Adds a render for `pose` to the cursor layer.
    pub fn record_pose_image(&mut self, pose: Pose, image: ImageRef) {
        self.layers[self.cursor].record(pose, image);
    }

    /// Poses already rendered for the cursor layer.
    pub fn available_poses(&self) -> Vec<Pose> {
        self.current_layer().images().poses().cloned().collect()
    }
}
