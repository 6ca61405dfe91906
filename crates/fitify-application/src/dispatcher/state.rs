use fitify_core::garment::Wardrobe;
use fitify_core::image::{ImageRef, SourceImage};
use fitify_core::pose::{Pose, PoseCatalog};
use fitify_core::timeline::{Layer, Timeline};

/// Everything one try-on session knows, owned by the dispatcher.
///
/// Callers get clones through [`super::GenerationDispatcher::snapshot`]; only
/// the dispatcher mutates it.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) timeline: Option<Timeline>,
    pub(crate) pose_index: usize,
    pub(crate) original: Option<SourceImage>,
    pub(crate) model_transformed: bool,
    pub(crate) wardrobe: Wardrobe,
    pub(crate) balance: Option<u64>,
}

impl SessionState {
    pub(crate) fn new(wardrobe: Wardrobe) -> Self {
        Self {
            timeline: None,
            pose_index: 0,
            original: None,
            model_transformed: false,
            wardrobe,
            balance: None,
        }
    }

    /// Starts over with a fresh wardrobe. The known balance is kept.
    pub(crate) fn reset(&mut self, wardrobe: Wardrobe) {
        let balance = self.balance;
        *self = Self::new(wardrobe);
        self.balance = balance;
    }

    /// Seeds the timeline from `source` without transforming it.
    pub(crate) fn finalize(&mut self, poses: PoseCatalog, source: SourceImage) {
        self.timeline = Some(Timeline::new(poses, source.image.clone()));
        self.original = Some(source);
        self.model_transformed = false;
        self.pose_index = 0;
    }

    /// Replaces the timeline with one rooted at the transformed model.
    pub(crate) fn seed_transformed(&mut self, poses: PoseCatalog, model: ImageRef) {
        match self.timeline.as_mut() {
            Some(timeline) => timeline.initialize(model),
            None => self.timeline = Some(Timeline::new(poses, model)),
        }
        self.model_transformed = true;
        self.pose_index = 0;
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn pose_index(&self) -> usize {
        self.pose_index
    }

    pub fn current_pose(&self) -> Option<&Pose> {
        self.timeline
            .as_ref()
            .and_then(|t| t.poses().get(self.pose_index))
    }

    /// The untransformed upload; its identity is the cache key base.
    pub fn original(&self) -> Option<&SourceImage> {
        self.original.as_ref()
    }

    pub fn is_model_transformed(&self) -> bool {
        self.model_transformed
    }

    pub fn wardrobe(&self) -> &Wardrobe {
        &self.wardrobe
    }

    /// Last balance read from the ledger, if any.
    pub fn balance(&self) -> Option<u64> {
        self.balance
    }

    pub fn display_image(&self) -> Option<&ImageRef> {
        self.timeline
            .as_ref()
            .map(|t| t.display_image(self.pose_index))
    }

    /// The layers currently worn; empty before a model exists.
    pub fn active_layers(&self) -> &[Layer] {
        self.timeline
            .as_ref()
            .map(Timeline::active_slice)
            .unwrap_or(&[])
    }

    /// Poses already rendered for the current layer.
    pub fn available_poses(&self) -> Vec<Pose> {
        self.timeline
            .as_ref()
            .map(Timeline::available_poses)
            .unwrap_or_default()
    }

    /// Only the most recent garment counts as active in the wardrobe.
    pub fn active_garment_ids(&self) -> Vec<String> {
        self.timeline
            .as_ref()
            .and_then(|t| t.current_layer().garment_id())
            .map(|id| vec![id.to_string()])
            .unwrap_or_default()
    }
}
