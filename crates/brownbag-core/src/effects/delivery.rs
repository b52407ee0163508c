//! Delivery context trait.
//!
//! Every observer callback after the initial `Loading` runs on a delivery
//! context. Implementations must run jobs one at a time, in submission order,
//! and must not run them on the caller of `deliver` unless they are a
//! deliberately synchronous test handler.

use std::sync::Arc;

/// Unit of work marshalled onto the delivery context.
pub type DeliveryJob = Box<dyn FnOnce() + Send + 'static>;

/// Serialized execution context for observer callbacks.
pub trait DeliveryContext: Send + Sync {
    /// Enqueue a job. Jobs submitted from one thread run in that order.
    fn deliver(&self, job: DeliveryJob);
}

/// Blanket implementation for Arc<T> where T: DeliveryContext
impl<T: DeliveryContext + ?Sized> DeliveryContext for Arc<T> {
    fn deliver(&self, job: DeliveryJob) {
        (**self).deliver(job);
    }
}
