//! Deterministic execution contexts.
//!
//! - [`InlineTaskSpawner`] runs background work to completion inside `spawn`.
//! - [`InlineDeliveryContext`] runs delivery jobs inside `deliver`.
//! - [`ManualDeliveryContext`] queues jobs until the test runs them.

use brownbag_core::effects::{DeliveryContext, DeliveryJob, TaskSpawner};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;

/// Spawner that drives each task to completion on the calling thread.
///
/// Only suitable for tasks that never wait on a runtime timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineTaskSpawner;

impl TaskSpawner for InlineTaskSpawner {
    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        futures::executor::block_on(fut);
    }
}

/// Delivery context that runs each job immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDeliveryContext;

impl DeliveryContext for InlineDeliveryContext {
    fn deliver(&self, job: DeliveryJob) {
        job();
    }
}

/// Delivery context drained explicitly by the test.
#[derive(Clone)]
pub struct ManualDeliveryContext {
    queue: Arc<Mutex<VecDeque<DeliveryJob>>>,
    pending: Arc<watch::Sender<usize>>,
}

impl ManualDeliveryContext {
    /// Empty queue.
    pub fn new() -> Self {
        let (pending, _) = watch::channel(0);
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            pending: Arc::new(pending),
        }
    }

    /// Jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run the oldest queued job. Returns false if the queue was empty.
    pub fn run_next(&self) -> bool {
        let job = {
            let mut queue = self.queue.lock();
            let job = queue.pop_front();
            self.pending.send_replace(queue.len());
            job
        };
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run queued jobs, including ones they enqueue, until the queue is empty.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Wait until at least `count` jobs are queued.
    pub async fn wait_for_pending(&self, count: usize) {
        let mut rx = self.pending.subscribe();
        let _ = rx.wait_for(|pending| *pending >= count).await;
    }
}

impl Default for ManualDeliveryContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliveryContext for ManualDeliveryContext {
    fn deliver(&self, job: DeliveryJob) {
        let mut queue = self.queue.lock();
        queue.push_back(job);
        self.pending.send_replace(queue.len());
    }
}
