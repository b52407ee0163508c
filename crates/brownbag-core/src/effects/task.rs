//! Runtime-agnostic task spawning traits.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Cooperative cancellation token.
#[async_trait]
pub trait CancellationToken: Send + Sync {
    /// Resolves when cancellation is requested.
    async fn cancelled(&self);

    /// Non-blocking cancellation check.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Background execution context.
///
/// Repository lookups and the artificial delay run here, never on the
/// context that called `invoke`.
pub trait TaskSpawner: Send + Sync {
    /// Spawn a background task.
    fn spawn(&self, fut: BoxFuture<'static, ()>);
}

/// Blanket implementation for Arc<T> where T: TaskSpawner
impl<T: TaskSpawner + ?Sized> TaskSpawner for Arc<T> {
    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        (**self).spawn(fut);
    }
}
