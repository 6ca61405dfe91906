use crate::garment::GarmentRef;
use crate::image::ImageRef;
use crate::pose::Pose;
use serde::Serialize;

/// Rendered images of one layer, keyed by pose.
///
/// Entries keep the order in which they were generated, so the first entry
/// is always the render the layer was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoseImages {
    entries: Vec<(Pose, ImageRef)>,
}

impl PoseImages {
    fn single(pose: Pose, image: ImageRef) -> Self {
        Self {
            entries: vec![(pose, image)],
        }
    }

    pub fn get(&self, pose: &Pose) -> Option<&ImageRef> {
        self.entries
            .iter()
            .find(|(p, _)| p == pose)
            .map(|(_, image)| image)
    }

    pub fn contains(&self, pose: &Pose) -> bool {
        self.get(pose).is_some()
    }

    /// The first image present; never `None` for a constructed layer.
    pub fn first(&self) -> Option<&ImageRef> {
        self.entries.first().map(|(_, image)| image)
    }

    pub fn poses(&self) -> impl Iterator<Item = &Pose> {
        self.entries.iter().map(|(p, _)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pose, &ImageRef)> {
        self.entries.iter().map(|(p, i)| (p, i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, pose: Pose, image: ImageRef) {
        match self.entries.iter_mut().find(|(p, _)| *p == pose) {
            Some(entry) => entry.1 = image,
            None => self.entries.push((pose, image)),
        }
    }
}

/// One entry in the outfit timeline.
///
/// Only the root layer has no garment, and it can only be created by
/// [`crate::timeline::Timeline::new`]. Every layer holds at least one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    garment: Option<GarmentRef>,
    images: PoseImages,
}

impl Layer {
    pub(crate) fn root(pose: Pose, image: ImageRef) -> Self {
        Self {
            garment: None,
            images: PoseImages::single(pose, image),
        }
    }

    /// A garment layer with its first render.
    pub fn with_garment(garment: GarmentRef, pose: Pose, image: ImageRef) -> Self {
        Self {
            garment: Some(garment),
            images: PoseImages::single(pose, image),
        }
    }

    pub fn garment(&self) -> Option<&GarmentRef> {
        self.garment.as_ref()
    }

    pub fn garment_id(&self) -> Option<&str> {
        self.garment.as_ref().map(|g| g.id.as_str())
    }

    pub fn images(&self) -> &PoseImages {
        &self.images
    }

    pub fn image_for(&self, pose: &Pose) -> Option<&ImageRef> {
        self.images.get(pose)
    }

    /// Any image of this layer, used as the base for pose generation.
    pub fn any_image(&self) -> Option<&ImageRef> {
        self.images.first()
    }

    pub(crate) fn record(&mut self, pose: Pose, image: ImageRef) {
        self.images.insert(pose, image);
    }
}
