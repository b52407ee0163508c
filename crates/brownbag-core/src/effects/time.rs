//! Time effect trait.
//!
//! The loader only needs a clock to model backend latency. Handlers decide
//! whether a sleep really waits (`RealTimeHandler`), advances a virtual clock
//! instantly (`SimulatedTimeHandler`), or parks until a test advances time
//! (`ControllableTimeSource`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for time operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    /// The clock cannot serve requests
    #[error("Time service unavailable")]
    ServiceUnavailable,
    /// A time operation failed
    #[error("Operation failed: {reason}")]
    OperationFailed {
        /// Failure description
        reason: String,
    },
}

/// Clock capability used for artificial latency.
#[async_trait]
pub trait TimeEffects: Send + Sync {
    /// Current time in milliseconds, as seen by this handler.
    async fn now_ms(&self) -> u64;

    /// Suspend the calling task for `ms` milliseconds.
    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError>;
}

/// Blanket implementation for Arc<T> where T: TimeEffects
#[async_trait]
impl<T: TimeEffects + ?Sized> TimeEffects for std::sync::Arc<T> {
    async fn now_ms(&self) -> u64 {
        (**self).now_ms().await
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        (**self).sleep_ms(ms).await
    }
}
