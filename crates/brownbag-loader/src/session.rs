//! Caller-side retry orchestration.
//!
//! A session remembers the last identifier and observer handed to a loader
//! and holds the live handle, so a retry can cancel the previous attempt
//! before starting the next one. It never retries on its own.

use crate::handle::CancellationHandle;
use crate::loader::ContentLoader;
use brownbag_core::{BrownbagError, ContentId, Observer, Result};
use parking_lot::Mutex;
use std::sync::Arc;

struct SessionState<T> {
    last: Option<(Option<ContentId>, Arc<dyn Observer<T>>)>,
    current: Option<CancellationHandle>,
}

/// Holds the live attempt of one screen-like consumer.
pub struct LoadSession<T> {
    loader: ContentLoader<T>,
    state: Mutex<SessionState<T>>,
}

impl<T: Send + 'static> LoadSession<T> {
    /// Session with nothing loaded yet.
    pub fn new(loader: ContentLoader<T>) -> Self {
        Self {
            loader,
            state: Mutex::new(SessionState {
                last: None,
                current: None,
            }),
        }
    }

    /// Underlying loader.
    pub fn loader(&self) -> &ContentLoader<T> {
        &self.loader
    }

    /// Cancel the held attempt, then start a new one.
    pub fn load<O>(&self, id: Option<ContentId>, observer: O) -> CancellationHandle
    where
        O: Observer<T>,
    {
        self.start(id, Arc::new(observer))
    }

    /// Re-invoke with the last identifier and observer.
    pub fn retry(&self) -> Result<CancellationHandle> {
        let last = self.state.lock().last.clone();
        let (id, observer) =
            last.ok_or_else(|| BrownbagError::invalid("retry requested before any load"))?;
        tracing::debug!(id = ?id, "retrying load");
        Ok(self.start(id, observer))
    }

    /// Cancel the held attempt. Returns true if it was still pending.
    pub fn cancel(&self) -> bool {
        let current = self.state.lock().current.take();
        current.map(|handle| handle.cancel()).unwrap_or(false)
    }

    /// Handle of the most recent attempt, if any.
    pub fn current(&self) -> Option<CancellationHandle> {
        self.state.lock().current.clone()
    }

    fn start(&self, id: Option<ContentId>, observer: Arc<dyn Observer<T>>) -> CancellationHandle {
        // Never call into the loader or a handle with the session lock held:
        // inline contexts run observers synchronously, and observers may use
        // the session.
        let previous = self.state.lock().current.take();
        if let Some(previous) = previous {
            previous.cancel();
        }

        let handle = self
            .loader
            .invoke_shared(id.clone(), Arc::clone(&observer));

        let replaced = {
            let mut state = self.state.lock();
            state.last = Some((id, observer));
            state.current.replace(handle.clone())
        };
        // A concurrent load may have slipped in between; keep only ours live.
        if let Some(replaced) = replaced {
            replaced.cancel();
        }
        handle
    }
}

impl<T> std::fmt::Debug for LoadSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LoadSession")
            .field("last_id", &state.last.as_ref().map(|(id, _)| id))
            .field("current", &state.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brownbag_core::{ContentState, FailureSchedule, LoaderConfig};
    use brownbag_testkit::{immediate_effects, RecordingObserver};

    fn session() -> LoadSession<u32> {
        let loader = ContentLoader::from_fn(
            |id: Option<&ContentId>| id.map(|id| id.as_str().len() as u32),
            immediate_effects(),
            LoaderConfig::immediate().with_failure_schedule(FailureSchedule::FirstAttempt),
        );
        LoadSession::new(loader)
    }

    #[test]
    fn test_retry_before_load_is_invalid() {
        let session = session();
        assert!(matches!(session.retry(), Err(BrownbagError::Invalid { .. })));
        assert!(session.current().is_none());
        assert!(!session.cancel());
    }

    #[test]
    fn test_retry_reuses_identifier_and_observer() {
        let session = session();
        let observer = RecordingObserver::new();

        session.load(Some("abc".into()), observer.clone());
        assert!(observer.last().is_some_and(|s| s.is_error()));

        let handle = session.retry().unwrap();
        assert!(handle.is_finished());
        assert_eq!(handle.content_id(), Some(&ContentId::new("abc")));
        assert_eq!(observer.last(), Some(ContentState::Content(3)));
        assert_eq!(session.loader().delivered_attempts(), 2);
    }
}
