//! Generation dispatch.
//!
//! - `flight`: the single-flight slot (`RequestKind`, `PendingRequest`)
//! - `compensation`: optimistic pose selection with rollback
//! - `notifier`: UI-facing callbacks (`SessionNotifier`)
//! - `outcome`: results and errors of user actions
//! - `state`: the per-session state owned by the dispatcher
//! - `service`: the dispatcher itself (`GenerationDispatcher`)

mod compensation;
mod flight;
mod notifier;
mod outcome;
mod service;
mod state;


pub use flight::{PendingRequest, RequestKind};
pub use notifier::{NoopNotifier, SessionNotifier};
pub use outcome::{DispatchError, DispatchOutcome, RejectReason};
pub use service::GenerationDispatcher;
pub use state::SessionState;
