//! Per-attempt state machine.
//!
//! `Idle -> Loading -> {Content | Error}`, plus `Loading -> Cancelled`.
//! `Cancelled` is bookkeeping only: it never reaches an observer, it just
//! means no terminal emission happens.
//!
//! # Locking
//!
//! The phase and the observer live behind one `ReentrantMutex`. The
//! cancellation check and the terminal observer call happen while it is held,
//! so `cancel()` returning means no observer call can still be in flight for
//! this attempt. Re-entrancy lets an observer cancel its own attempt from
//! inside the callback; that cancel finds a terminal phase and is a no-op.

use async_trait::async_trait;
use brownbag_core::effects::CancellationToken;
use brownbag_core::{ContentId, ContentState, Observer};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// Lifecycle phase of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptPhase {
    /// Constructed, `Loading` not emitted yet
    Idle,
    /// `Loading` emitted, terminal pending
    Loading,
    /// `Content` delivered
    Content,
    /// `Error` delivered
    Error,
    /// Cancelled before terminal delivery
    Cancelled,
}

/// Rejected state-machine move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal attempt transition {from:?} -> {to:?}")]
pub struct TransitionError {
    /// Phase the attempt was in
    pub from: AttemptPhase,
    /// Phase that was requested
    pub to: AttemptPhase,
}

impl AttemptPhase {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AttemptPhase::Content | AttemptPhase::Error | AttemptPhase::Cancelled
        )
    }

    /// Validate a move to `next`.
    pub fn transition(self, next: AttemptPhase) -> Result<AttemptPhase, TransitionError> {
        use AttemptPhase::*;
        match (self, next) {
            (Idle, Loading) | (Loading, Content) | (Loading, Error) | (Loading, Cancelled) => {
                Ok(next)
            }
            (from, to) => Err(TransitionError { from, to }),
        }
    }

    /// Phase reached by delivering `state`.
    pub fn for_state<T>(state: &ContentState<T>) -> AttemptPhase {
        match state {
            ContentState::Loading => AttemptPhase::Loading,
            ContentState::Content(_) => AttemptPhase::Content,
            ContentState::Error(_) => AttemptPhase::Error,
        }
    }
}

struct Slot<T> {
    phase: AttemptPhase,
    observer: Option<Arc<dyn Observer<T>>>,
}

/// One invocation of a loader.
pub(crate) struct Attempt<T> {
    id: Uuid,
    content_id: Option<ContentId>,
    slot: ReentrantMutex<RefCell<Slot<T>>>,
    cancelled_tx: watch::Sender<bool>,
}

impl<T: 'static> Attempt<T> {
    pub(crate) fn new(content_id: Option<ContentId>, observer: Arc<dyn Observer<T>>) -> Self {
        let (cancelled_tx, _cancelled_rx) = watch::channel(false);
        Self {
            id: Uuid::new_v4(),
            content_id,
            slot: ReentrantMutex::new(RefCell::new(Slot {
                phase: AttemptPhase::Idle,
                observer: Some(observer),
            })),
            cancelled_tx,
        }
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn content_id(&self) -> Option<&ContentId> {
        self.content_id.as_ref()
    }

    pub(crate) fn phase(&self) -> AttemptPhase {
        let guard = self.slot.lock();
        let phase = guard.borrow().phase;
        phase
    }

    /// `Idle -> Loading`, emitting `Loading` on the calling thread.
    pub(crate) fn begin(&self) {
        let guard = self.slot.lock();
        let observer = {
            let mut slot = guard.borrow_mut();
            match slot.phase.transition(AttemptPhase::Loading) {
                Ok(next) => slot.phase = next,
                Err(e) => {
                    tracing::warn!(attempt_id = %self.id, error = %e, "attempt already started");
                    return;
                }
            }
            slot.observer.clone()
        };
        if let Some(observer) = observer {
            observer.on_state(ContentState::Loading);
        }
    }

    /// Deliver the terminal state produced by `resolve`, unless cancelled.
    ///
    /// `resolve` only runs when delivery will happen, so side effects inside
    /// it (failure schedule accounting) are skipped for cancelled attempts.
    pub(crate) fn deliver_with<F>(&self, resolve: F) -> bool
    where
        F: FnOnce() -> ContentState<T>,
    {
        let guard = self.slot.lock();
        let (observer, state) = {
            let mut slot = guard.borrow_mut();
            if slot.phase != AttemptPhase::Loading {
                return false;
            }
            let state = resolve();
            match slot.phase.transition(AttemptPhase::for_state(&state)) {
                Ok(next) => slot.phase = next,
                Err(e) => {
                    tracing::warn!(attempt_id = %self.id, error = %e, "refusing non-terminal delivery");
                    return false;
                }
            }
            (slot.observer.take(), state)
        };
        if let Some(observer) = observer {
            observer.on_state(state);
        }
        true
    }

    /// `Loading -> Cancelled`. Returns true only for the effective call.
    pub(crate) fn cancel(&self) -> bool {
        let guard = self.slot.lock();
        let observer = {
            let mut slot = guard.borrow_mut();
            match slot.phase.transition(AttemptPhase::Cancelled) {
                Ok(next) => slot.phase = next,
                Err(_) => return false,
            }
            slot.observer.take()
        };
        self.cancelled_tx.send_replace(true);
        drop(guard);
        drop(observer);
        true
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        *self.cancelled_tx.borrow()
    }
}

#[async_trait]
impl<T: 'static> CancellationToken for Attempt<T> {
    async fn cancelled(&self) {
        let mut rx = self.cancelled_tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    fn is_cancelled(&self) -> bool {
        Attempt::is_cancelled(self)
    }
}
