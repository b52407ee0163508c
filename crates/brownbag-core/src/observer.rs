//! Observer registration contract.
//!
//! An observer is passed explicitly to every `invoke`; there is no implicit
//! subscription graph. `Loading` reaches it on the invoking thread, terminal
//! states on the delivery context.

use crate::state::ContentState;

/// Receiver of one attempt's state sequence.
pub trait Observer<T>: Send + Sync + 'static {
    /// Receive the next state of the attempt.
    fn on_state(&self, state: ContentState<T>);
}

impl<T, F> Observer<T> for F
where
    F: Fn(ContentState<T>) + Send + Sync + 'static,
{
    fn on_state(&self, state: ContentState<T>) {
        self(state);
    }
}
