/// Callbacks through which the dispatcher surfaces progress and failures.
///
/// All methods default to no-ops so implementors only override what their
/// front end renders.
pub trait SessionNotifier: Send + Sync {
    /// A generation started; `message` describes it ("Adding Polo...").
    fn loading_started(&self, _message: &str) {}

    /// The generation settled, successfully or not.
    fn loading_finished(&self) {}

    /// A new action started; any previous error message is stale.
    fn error_cleared(&self) {}

    /// A user-facing error message.
    fn error(&self, _message: &str) {}

    /// The user ran out of credit; show the purchase/redeem prompt.
    fn credit_prompt(&self, _balance: Option<u64>) {}

    /// The displayed credit balance changed.
    fn balance_changed(&self, _balance: u64) {}
}

/// A notifier that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl SessionNotifier for NoopNotifier {}
