//! Recording observer

use brownbag_core::{ContentState, Observer};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tokio::sync::watch;

struct Recorded<T> {
    events: Mutex<Vec<(ContentState<T>, ThreadId)>>,
    len: watch::Sender<usize>,
}

/// Observer that records every state it receives and the thread it ran on.
///
/// Clones share one recording, so a clone can be handed to `invoke` while
/// the test keeps the original for assertions.
pub struct RecordingObserver<T> {
    inner: Arc<Recorded<T>>,
}

impl<T> Clone for RecordingObserver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> RecordingObserver<T> {
    /// Empty recording.
    pub fn new() -> Self {
        let (len, _) = watch::channel(0);
        Self {
            inner: Arc::new(Recorded {
                events: Mutex::new(Vec::new()),
                len,
            }),
        }
    }

    /// Number of states received.
    pub fn len(&self) -> usize {
        self.inner.events.lock().len()
    }

    /// Whether nothing was received yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `Content` or `Error` states received.
    pub fn terminal_count(&self) -> usize {
        self.inner
            .events
            .lock()
            .iter()
            .filter(|(state, _)| state.is_terminal())
            .count()
    }

    /// Thread of each received state, in arrival order.
    pub fn threads(&self) -> Vec<ThreadId> {
        self.inner.events.lock().iter().map(|(_, t)| *t).collect()
    }

    /// Wait until at least `count` states were received.
    pub async fn wait_for_len(&self, count: usize) {
        let mut rx = self.inner.len.subscribe();
        let _ = rx.wait_for(|len| *len >= count).await;
    }
}

impl<T: Clone> RecordingObserver<T> {
    /// States received so far, in order.
    pub fn states(&self) -> Vec<ContentState<T>> {
        self.inner
            .events
            .lock()
            .iter()
            .map(|(state, _)| state.clone())
            .collect()
    }

    /// Most recent state.
    pub fn last(&self) -> Option<ContentState<T>> {
        self.inner
            .events
            .lock()
            .last()
            .map(|(state, _)| state.clone())
    }
}

impl<T: Send + 'static> RecordingObserver<T> {
    /// Type-erased handle for `invoke_shared`.
    pub fn shared(&self) -> Arc<dyn Observer<T>> {
        Arc::new(self.clone())
    }
}

impl<T> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Observer<T> for RecordingObserver<T> {
    fn on_state(&self, state: ContentState<T>) {
        let len = {
            let mut events = self.inner.events.lock();
            events.push((state, thread::current().id()));
            events.len()
        };
        self.inner.len.send_replace(len);
    }
}
