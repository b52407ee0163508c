//! Serial delivery context backed by a dedicated thread.
//!
//! Models a UI main thread: one named OS thread drains a queue of jobs in
//! submission order. Observer callbacks never run on the tokio workers that
//! perform lookups and delays.

use brownbag_core::effects::{DeliveryContext, DeliveryJob};
use brownbag_core::BrownbagError;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::mpsc;

const THREAD_NAME: &str = "brownbag-delivery";

/// Dedicated-thread delivery context.
pub struct SerialDeliveryContext {
    tx: Mutex<Option<mpsc::UnboundedSender<DeliveryJob>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    thread_id: ThreadId,
}

impl SerialDeliveryContext {
    /// Start the delivery thread.
    pub fn start() -> Result<Self, BrownbagError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<DeliveryJob>();
        let worker = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                while let Some(job) = rx.blocking_recv() {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        tracing::warn!("delivery job panicked; continuing with next job");
                    }
                }
                tracing::debug!("delivery queue closed");
            })
            .map_err(|e| BrownbagError::internal(format!("failed to start delivery thread: {e}")))?;

        let thread_id = worker.thread().id();
        Ok(Self {
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
            thread_id,
        })
    }

    /// Identity of the delivery thread.
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Whether the caller is running on the delivery thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Close the queue and wait for already submitted jobs to finish.
    ///
    /// Must not be called from the delivery thread itself.
    pub fn shutdown(&self) {
        self.tx.lock().take();
        if self.is_current() {
            return;
        }
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                tracing::warn!("delivery thread terminated abnormally");
            }
        }
    }
}

impl DeliveryContext for SerialDeliveryContext {
    fn deliver(&self, job: DeliveryJob) {
        let tx = self.tx.lock();
        match tx.as_ref() {
            Some(tx) => {
                if tx.send(job).is_err() {
                    tracing::warn!("delivery queue closed; dropping job");
                }
            }
            None => tracing::warn!("delivery context shut down; dropping job"),
        }
    }
}

impl Drop for SerialDeliveryContext {
    fn drop(&mut self) {
        self.tx.lock().take();
    }
}
