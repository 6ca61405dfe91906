use fitify_core::FitifyError;
use fitify_core::generator::{GenerationError, GenerationErrorKind};
use thiserror::Error;

/// What a user action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The uploaded photo was accepted as the model.
    ModelReady,
    /// The generator was called and its result applied.
    Generated,
    /// Served from the cache, no credit spent.
    CacheHit,
    /// Moved onto the previously undone layer, no credit spent.
    BranchReused,
    /// Switched to a pose already rendered for the current layer.
    PoseSwitched,
    /// Generated a new pose for the current layer.
    PoseGenerated,
    GarmentRemoved,
    SessionReset,
    /// The action was ignored; nothing changed.
    Rejected(RejectReason),
}

impl DispatchOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Why an action was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A generation is in flight.
    Busy,
    /// No model image yet.
    NoModel,
    /// The requested pose is already selected.
    SamePose,
    /// Only the base layer is worn.
    NothingToRemove,
    /// The model was already transformed.
    AlreadyTransformed,
}

/// A failed user action, classified for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{message}")]
    InsufficientCredit { message: String },

    #[error("{message}")]
    GenerationFailed { message: String },

    #[error("{0}")]
    InvalidInput(String),
}

impl DispatchError {
    /// Classifies a generator failure, keeping `message` for display.
    pub(crate) fn from_generation(err: &GenerationError, message: String) -> Self {
        match err.kind {
            GenerationErrorKind::InsufficientCredit => Self::InsufficientCredit { message },
            GenerationErrorKind::Generic => Self::GenerationFailed { message },
        }
    }

    pub fn is_insufficient_credit(&self) -> bool {
        matches!(self, Self::InsufficientCredit { .. })
    }
}

impl From<FitifyError> for DispatchError {
    fn from(err: FitifyError) -> Self {
        match err {
            FitifyError::InvalidInput(message) => Self::InvalidInput(message),
            other => Self::GenerationFailed {
                message: other.to_string(),
            },
        }
    }
}

/// Formats a failure for display: `"<context>. <detail>"`.
pub(crate) fn friendly_message(context: &str, detail: &str) -> String {
    let detail = detail.trim();
    if detail.is_empty() {
        format!("{context}.")
    } else {
        format!("{context}. {detail}")
    }
}
