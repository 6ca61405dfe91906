use super::notifier::SessionNotifier;
use fitify_core::cache::CacheKey;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What an in-flight generation is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    InitialTransform,
    ApplyGarment,
    ChangePose,
}

/// The generation currently outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub kind: RequestKind,
    pub key: CacheKey,
}

/// Holds at most one [`PendingRequest`].
///
/// A slot is claimed with [`FlightSlot::try_begin`] and released when the
/// returned guard drops, whichever way the flow exits.
#[derive(Debug, Default)]
pub(crate) struct FlightSlot {
    pending: Mutex<Option<PendingRequest>>,
}

impl FlightSlot {
    /// Claims the slot, or returns `None` if a request is already pending.
    pub(crate) fn try_begin(&self, request: PendingRequest) -> Option<FlightGuard<'_>> {
        let mut pending = self.lock();
        if pending.is_some() {
            return None;
        }
        *pending = Some(request);
        Some(FlightGuard {
            slot: self,
            loading: None,
        })
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.lock().is_none()
    }

    pub(crate) fn current(&self) -> Option<PendingRequest> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<PendingRequest>> {
        // The slot holds plain data; a panic elsewhere cannot leave it torn.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the slot and clears the loading indicator on drop.
pub(crate) struct FlightGuard<'a> {
    slot: &'a FlightSlot,
    loading: Option<&'a dyn SessionNotifier>,
}

impl<'a> FlightGuard<'a> {
    /// Shows the loading indicator until the guard drops.
    pub(crate) fn show_loading(&mut self, notifier: &'a dyn SessionNotifier, message: &str) {
        notifier.loading_started(message);
        self.loading = Some(notifier);
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
        if let Some(notifier) = self.loading.take() {
            notifier.loading_finished();
        }
    }
}
