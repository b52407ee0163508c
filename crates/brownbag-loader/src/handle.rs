//! Caller-facing cancellation handle.

use crate::attempt::{Attempt, AttemptPhase};
use async_trait::async_trait;
use brownbag_core::effects::CancellationToken;
use brownbag_core::ContentId;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Type-erased view of an attempt, so handles do not carry the content type.
pub(crate) trait AttemptControl: CancellationToken {
    fn cancel(&self) -> bool;
    fn phase(&self) -> AttemptPhase;
    fn attempt_id(&self) -> Uuid;
    fn content_id(&self) -> Option<&ContentId>;
}

impl<T: Send + 'static> AttemptControl for Attempt<T> {
    fn cancel(&self) -> bool {
        Attempt::cancel(self)
    }

    fn phase(&self) -> AttemptPhase {
        Attempt::phase(self)
    }

    fn attempt_id(&self) -> Uuid {
        self.id()
    }

    fn content_id(&self) -> Option<&ContentId> {
        Attempt::content_id(self)
    }
}

/// Handle returned by `ContentLoader::invoke`.
///
/// Cancelling is idempotent. Once `cancel()` returns the observer receives no
/// further calls for this attempt, even when the terminal delivery was racing
/// with the cancel.
#[derive(Clone)]
pub struct CancellationHandle {
    inner: Arc<dyn AttemptControl>,
}

impl CancellationHandle {
    pub(crate) fn new(inner: Arc<dyn AttemptControl>) -> Self {
        Self { inner }
    }

    /// Cancel the attempt. Returns true only for the call that took effect.
    pub fn cancel(&self) -> bool {
        let cancelled = self.inner.cancel();
        if cancelled {
            tracing::debug!(attempt_id = %self.inner.attempt_id(), "attempt cancelled");
        }
        cancelled
    }

    /// Whether a cancel took effect before the terminal delivery.
    pub fn is_cancelled(&self) -> bool {
        self.inner.phase() == AttemptPhase::Cancelled
    }

    /// Whether a terminal state was delivered.
    pub fn is_finished(&self) -> bool {
        matches!(self.inner.phase(), AttemptPhase::Content | AttemptPhase::Error)
    }

    /// Current phase of the attempt.
    pub fn phase(&self) -> AttemptPhase {
        self.inner.phase()
    }

    /// Unique id of the attempt, as logged.
    pub fn attempt_id(&self) -> Uuid {
        self.inner.attempt_id()
    }

    /// Identifier the attempt was invoked with.
    pub fn content_id(&self) -> Option<&ContentId> {
        self.inner.content_id()
    }
}

impl fmt::Debug for CancellationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationHandle")
            .field("attempt_id", &self.inner.attempt_id())
            .field("content_id", &self.inner.content_id())
            .field("phase", &self.inner.phase())
            .finish()
    }
}

#[async_trait]
impl CancellationToken for CancellationHandle {
    async fn cancelled(&self) {
        self.inner.cancelled().await;
    }

    fn is_cancelled(&self) -> bool {
        CancellationHandle::is_cancelled(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brownbag_core::{ContentState, Observer};

    fn started(id: Option<&str>) -> (Arc<Attempt<u8>>, CancellationHandle) {
        let observer: Arc<dyn Observer<u8>> = Arc::new(|_: ContentState<u8>| {});
        let attempt = Arc::new(Attempt::new(id.map(ContentId::from), observer));
        attempt.begin();
        let handle = CancellationHandle::new(attempt.clone());
        (attempt, handle)
    }

    #[test]
    fn test_handle_cancel_is_idempotent() {
        let (_attempt, handle) = started(Some("p1"));
        let other = handle.clone();

        assert_eq!(handle.phase(), AttemptPhase::Loading);
        assert!(handle.cancel());
        assert!(!other.cancel());
        assert!(other.is_cancelled());
        assert!(!other.is_finished());
        assert_eq!(handle.attempt_id(), other.attempt_id());
        assert_eq!(handle.content_id(), Some(&ContentId::new("p1")));
    }

    #[test]
    fn test_handle_reports_finished() {
        let (attempt, handle) = started(None);
        assert!(attempt.deliver_with(|| ContentState::Content(1)));
        assert!(handle.is_finished());
        assert!(!handle.cancel());
        assert!(!handle.is_cancelled());
        assert_eq!(handle.content_id(), None);
    }

    #[test]
    fn test_debug_names_attempt() {
        let (_attempt, handle) = started(Some("p2"));
        let rendered = format!("{handle:?}");
        assert!(rendered.contains("CancellationHandle"));
        assert!(rendered.contains(&handle.attempt_id().to_string()));
    }
}
