//! Test clock whose sleeps park until the test moves time forward.

use async_trait::async_trait;
use brownbag_core::effects::{TimeEffects, TimeError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Controllable time source for deterministic testing
///
/// Time only moves when a test calls [`advance`](Self::advance) or
/// [`set_time`](Self::set_time). `sleep_ms` parks until the virtual clock
/// reaches its deadline, which lets a test put a cancel at any point of an
/// attempt's delay: before it starts, while parked, or right after it ends.
#[derive(Clone)]
pub struct ControllableTimeSource {
    current_time: Arc<watch::Sender<u64>>,
    sleepers: Arc<watch::Sender<usize>>,
    failing: Arc<AtomicBool>,
}

/// Keeps the parked-sleeper count accurate even when a sleep is dropped early.
struct SleeperGuard<'a> {
    sleepers: &'a watch::Sender<usize>,
}

impl<'a> SleeperGuard<'a> {
    fn enter(sleepers: &'a watch::Sender<usize>) -> Self {
        sleepers.send_modify(|count| *count += 1);
        Self { sleepers }
    }
}

impl Drop for SleeperGuard<'_> {
    fn drop(&mut self) {
        self.sleepers
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

impl ControllableTimeSource {
    /// Create new controllable time source starting at given time in ms
    pub fn new(initial_ms: u64) -> Self {
        let (current_time, _) = watch::channel(initial_ms);
        let (sleepers, _) = watch::channel(0);
        Self {
            current_time: Arc::new(current_time),
            sleepers: Arc::new(sleepers),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Advance time, waking every sleeper whose deadline has passed
    pub fn advance(&self, ms: u64) {
        self.current_time
            .send_modify(|now| *now = now.saturating_add(ms));
    }

    /// Set absolute time
    pub fn set_time(&self, time_ms: u64) {
        self.current_time.send_replace(time_ms);
    }

    /// Get current time
    pub fn current_time(&self) -> u64 {
        *self.current_time.borrow()
    }

    /// Number of sleeps currently parked
    pub fn sleepers(&self) -> usize {
        *self.sleepers.borrow()
    }

    /// Wait until at least `count` sleeps are parked
    pub async fn wait_for_sleepers(&self, count: usize) {
        let mut rx = self.sleepers.subscribe();
        let _ = rx.wait_for(|parked| *parked >= count).await;
    }

    /// Make every subsequent `sleep_ms` fail with `ServiceUnavailable`
    pub fn fail_sleeps(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for ControllableTimeSource {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl TimeEffects for ControllableTimeSource {
    async fn now_ms(&self) -> u64 {
        self.current_time()
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TimeError::ServiceUnavailable);
        }
        let deadline = self.current_time().saturating_add(ms);
        let mut rx = self.current_time.subscribe();
        let _parked = SleeperGuard::enter(&self.sleepers);
        rx.wait_for(|now| *now >= deadline)
            .await
            .map_err(|_| TimeError::OperationFailed {
                reason: "time source dropped".to_string(),
            })?;
        Ok(())
    }
}
