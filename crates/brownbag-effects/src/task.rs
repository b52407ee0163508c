//! Tokio task spawner for the loader's background context.
//!
//! Tracks spawned tasks and supports cooperative shutdown.
//!
//! # Blocking Lock Usage
//!
//! Uses `parking_lot::Mutex` for JoinHandle storage because:
//! 1. Operations are O(n) retain on push and O(n) drain on shutdown
//! 2. Lock is never held across `.await` points
//! 3. No I/O or async work inside lock scope

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use brownbag_core::effects::{CancellationToken, TaskSpawner};
use brownbag_core::BrownbagError;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Tracked tokio spawner used as the background context.
#[derive(Debug)]
pub struct TokioTaskSpawner {
    runtime: Handle,
    shutdown_tx: watch::Sender<bool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioTaskSpawner {
    /// Spawner bound to the runtime of the calling context.
    pub fn new() -> Result<Self, BrownbagError> {
        let runtime = Handle::try_current()
            .map_err(|e| BrownbagError::internal(format!("no tokio runtime available: {e}")))?;
        Ok(Self::from_handle(runtime))
    }

    /// Spawner bound to an explicit runtime handle.
    pub fn from_handle(runtime: Handle) -> Self {
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        Self {
            runtime,
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn a task that stops early on shutdown.
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if *self.shutdown_tx.borrow() {
            tracing::warn!("task spawned after spawner shutdown; dropping it");
            return;
        }
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let handle = self.runtime.spawn(async move {
            tokio::select! {
                _ = shutdown_rx.changed() => {}
                _ = fut => {}
            }
        });
        let mut handles = self.handles.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Number of spawned tasks that have not finished yet.
    pub fn active_tasks(&self) -> usize {
        let mut handles = self.handles.lock();
        handles.retain(|h| !h.is_finished());
        handles.len()
    }

    /// Signal shutdown and abort every tracked task.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles.lock().drain(..) {
            handle.abort();
        }
    }

    /// Token that fires when the spawner shuts down.
    pub fn cancellation_token(&self) -> Arc<dyn CancellationToken> {
        Arc::new(SpawnerCancellationToken {
            shutdown_rx: self.shutdown_tx.subscribe(),
        })
    }
}

impl Drop for TokioTaskSpawner {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles.lock().drain(..) {
            handle.abort();
        }
    }
}

#[derive(Debug)]
struct SpawnerCancellationToken {
    shutdown_rx: watch::Receiver<bool>,
}

#[async_trait]
impl CancellationToken for SpawnerCancellationToken {
    async fn cancelled(&self) {
        let mut shutdown_rx = self.shutdown_rx.clone();
        loop {
            if *shutdown_rx.borrow() {
                return;
            }
            if shutdown_rx.changed().await.is_err() {
                return;
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}

impl TaskSpawner for TokioTaskSpawner {
    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        TokioTaskSpawner::spawn(self, fut);
    }
}
