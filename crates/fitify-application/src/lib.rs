//! Application layer for Fitify.
//!
//! Coordinates the domain types of `fitify-core` with the external
//! collaborators: the [`GenerationDispatcher`] turns user actions into
//! timeline updates, cache hits or generator calls, and the
//! [`GalleryService`] exposes the persisted generation history.

pub mod dispatcher;
pub mod gallery;

pub use dispatcher::{
    DispatchError, DispatchOutcome, GenerationDispatcher, NoopNotifier, PendingRequest,
    RejectReason, RequestKind, SessionNotifier, SessionState,
};
pub use gallery::GalleryService;
