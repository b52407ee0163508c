//! Repository adapter for blocking lookups.
//!
//! Wraps a synchronous lookup (a file scan, an embedded database call) and
//! runs it on tokio's blocking pool so it never stalls an async worker.
//! Outside a tokio runtime there is no blocking pool, and the lookup runs
//! inline on the polling thread instead.

use async_trait::async_trait;
use brownbag_core::effects::Repository;
use brownbag_core::ContentId;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Repository whose lookup runs on the blocking pool.
pub struct BlockingRepository<F> {
    lookup: Arc<F>,
}

impl<F> BlockingRepository<F> {
    /// Wrap a synchronous lookup
    pub fn new(lookup: F) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

#[async_trait]
impl<T, F> Repository<T> for BlockingRepository<F>
where
    T: Send + 'static,
    F: Fn(Option<&ContentId>) -> Option<T> + Send + Sync + 'static,
{
    async fn lookup(&self, id: Option<&ContentId>) -> Option<T> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::debug!("no tokio runtime; running blocking lookup inline");
                return (self.lookup)(id);
            }
        };
        let lookup = Arc::clone(&self.lookup);
        let id = id.cloned();
        match runtime.spawn_blocking(move || lookup(id.as_ref())).await {
            Ok(value) => value,
            Err(e) => {
                // A panicking lookup is indistinguishable from "not found" to the loader.
                tracing::warn!(error = %e, "blocking lookup failed");
                None
            }
        }
    }
}
