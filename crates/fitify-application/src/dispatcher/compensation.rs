use super::state::SessionState;

/// An optimistic pose selection that can be undone.
///
/// The pose label switches as soon as generation starts; if the generation
/// fails the previous index is restored.
#[must_use = "a tentative pose selection must be committed or reverted"]
#[derive(Debug)]
pub(crate) struct PoseSelection {
    prior: usize,
}

impl PoseSelection {
    /// Captures the current pose index, then applies `tentative`.
    pub(crate) fn apply(state: &mut SessionState, tentative: usize) -> Self {
        let prior = state.pose_index;
        state.pose_index = tentative;
        Self { prior }
    }

    /// Keeps the tentative index.
    pub(crate) fn commit(self) {}

    /// Restores the captured index.
    pub(crate) fn revert(self, state: &mut SessionState) {
        state.pose_index = self.prior;
    }
}
