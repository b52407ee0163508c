//! Real time effect handler for production use

use async_trait::async_trait;
use brownbag_core::effects::{TimeEffects, TimeError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time;

/// Real time handler for production use
///
/// Delegates to the system clock and `tokio::time::sleep`. Sleeping requires a
/// tokio runtime with the time driver enabled.
#[derive(Debug, Clone, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TimeEffects for RealTimeHandler {
    async fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        if ms > 0 {
            time::sleep(Duration::from_millis(ms)).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_now_ms_is_monotone_enough() {
        let handler = RealTimeHandler::new();
        let t1 = handler.now_ms().await;

        tokio::time::sleep(Duration::from_millis(10)).await;

        let t2 = handler.now_ms().await;
        assert!(t2 >= t1);
    }

    #[tokio::test]
    async fn test_sleep_ms() {
        let handler = RealTimeHandler::new();
        let start = Instant::now();

        handler.sleep_ms(50).await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(40)); // Allow some variance
    }

    #[tokio::test]
    async fn test_zero_sleep_returns_immediately() {
        let handler = RealTimeHandler::new();
        assert!(handler.sleep_ms(0).await.is_ok());
    }
}
