//! Pose instructions and the ordered pose catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The built-in pose instructions, in navigation order.
pub const DEFAULT_POSE_INSTRUCTIONS: [&str; 6] = [
    "Full frontal view, hands on hips",
    "Slightly turned, 3/4 view",
    "Side profile view",
    "Jumping in the air, mid-action shot",
    "Walking towards camera",
    "Leaning against a wall",
];

/// A pose, identified by the instruction sent to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose(String);

impl Pose {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self(instruction.into())
    }

    pub fn instruction(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed, ordered set of poses a session can switch between.
///
/// Index 0 is the default pose. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseCatalog {
    poses: Arc<[Pose]>,
}

impl PoseCatalog {
    /// Builds a catalog from instruction strings.
    ///
    /// Returns `None` when no instruction is given, since a catalog always
    /// needs a default pose.
    pub fn from_instructions<I, S>(instructions: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let poses: Vec<Pose> = instructions.into_iter().map(Pose::new).collect();
        if poses.is_empty() {
            return None;
        }
        Some(Self {
            poses: poses.into(),
        })
    }

    pub fn default_pose(&self) -> &Pose {
        &self.poses[0]
    }

    pub fn get(&self, index: usize) -> Option<&Pose> {
        self.poses.get(index)
    }

    pub fn index_of(&self, pose: &Pose) -> Option<usize> {
        self.poses.iter().position(|p| p == pose)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.poses.iter()
    }

    /// Index of the pose after `index`, wrapping to the first one.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.poses.len()
    }

    /// Index of the pose before `index`, wrapping to the last one.
    pub fn previous_index(&self, index: usize) -> usize {
        let len = self.poses.len();
        (index % len + len - 1) % len
    }
}

impl Default for PoseCatalog {
    fn default() -> Self {
        Self {
            poses: DEFAULT_POSE_INSTRUCTIONS.iter().map(|s| Pose::new(*s)).collect(),
        }
    }
}
