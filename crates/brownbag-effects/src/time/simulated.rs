//! Simulated time effect handler for testing and demos

use async_trait::async_trait;
use brownbag_core::effects::{TimeEffects, TimeError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Simulated time handler
///
/// Keeps a virtual clock. With the default (infinite) time scale every sleep
/// advances the clock instantly without touching a runtime, so a loader wired
/// to it resolves without real waiting.
#[derive(Debug, Clone)]
pub struct SimulatedTimeHandler {
    /// Current simulated time in milliseconds
    current_time: Arc<Mutex<u64>>,
    /// Total milliseconds requested through `sleep_ms`
    slept: Arc<Mutex<u64>>,
    /// Simulated time scale (1.0 = real time, 2.0 = 2x speed, infinite = instant)
    time_scale: f64,
}

impl SimulatedTimeHandler {
    /// Create a new simulated time handler starting at the given time
    pub fn new(start_time_ms: u64) -> Self {
        Self::with_time_scale(start_time_ms, f64::INFINITY)
    }

    /// Create a simulated time handler starting at Unix epoch
    pub fn new_at_epoch() -> Self {
        Self::new(0)
    }

    /// Create a simulated time handler with custom time scale
    pub fn with_time_scale(start_time_ms: u64, time_scale: f64) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start_time_ms)),
            slept: Arc::new(Mutex::new(0)),
            time_scale,
        }
    }

    /// Advance simulated time by the given duration
    pub fn advance_time(&self, duration_ms: u64) {
        *self.current_time.lock() += duration_ms;
    }

    /// Set the absolute simulated time
    pub fn set_time(&self, time_ms: u64) {
        *self.current_time.lock() = time_ms;
    }

    /// Get the current simulated time
    pub fn get_time(&self) -> u64 {
        *self.current_time.lock()
    }

    /// Total milliseconds requested through `sleep_ms` so far
    pub fn total_slept_ms(&self) -> u64 {
        *self.slept.lock()
    }

    fn is_instant(&self) -> bool {
        self.time_scale > 100.0
    }
}

impl Default for SimulatedTimeHandler {
    fn default() -> Self {
        Self::new_at_epoch()
    }
}

#[async_trait]
impl TimeEffects for SimulatedTimeHandler {
    async fn now_ms(&self) -> u64 {
        self.get_time()
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        if self.time_scale <= 0.0 || self.time_scale.is_nan() {
            return Err(TimeError::OperationFailed {
                reason: format!("invalid time scale {}", self.time_scale),
            });
        }

        if !self.is_instant() {
            let scaled = Duration::from_millis((ms as f64 / self.time_scale) as u64);
            tokio::time::sleep(scaled).await;
        }
        self.advance_time(ms);
        *self.slept.lock() += ms;
        Ok(())
    }
}
