//! Production handler composition.
//!
//! Wires the real clock, the tokio spawner and the dedicated delivery thread
//! into a `LoaderEffects` bundle.

use crate::delivery::SerialDeliveryContext;
use crate::task::TokioTaskSpawner;
use crate::time::RealTimeHandler;
use brownbag_core::effects::LoaderEffects;
use brownbag_core::BrownbagError;
use std::sync::Arc;

/// Owned production handlers.
pub struct ProductionEffects {
    /// Wall clock
    pub time: Arc<RealTimeHandler>,
    /// Background context
    pub spawner: Arc<TokioTaskSpawner>,
    /// Delivery thread
    pub delivery: Arc<SerialDeliveryContext>,
}

impl ProductionEffects {
    /// Build handlers on the current tokio runtime and start the delivery thread.
    pub fn start() -> Result<Self, BrownbagError> {
        let spawner = TokioTaskSpawner::new()?;
        let delivery = SerialDeliveryContext::start()?;
        tracing::debug!(delivery_thread = ?delivery.thread_id(), "production effects started");
        Ok(Self {
            time: Arc::new(RealTimeHandler::new()),
            spawner: Arc::new(spawner),
            delivery: Arc::new(delivery),
        })
    }

    /// Type-erased bundle for `ContentLoader::new`.
    pub fn loader_effects(&self) -> LoaderEffects {
        LoaderEffects::new(
            self.time.clone(),
            self.spawner.clone(),
            self.delivery.clone(),
        )
    }

    /// Abort background work, then drain and stop the delivery thread.
    pub fn shutdown(&self) {
        self.spawner.shutdown();
        self.delivery.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brownbag_core::effects::DeliveryContext;
    use std::sync::mpsc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_bundle_shares_handlers() {
        let production = ProductionEffects::start().unwrap();
        let effects = production.loader_effects();

        let (tx, rx) = mpsc::channel();
        effects.delivery.deliver(Box::new(move || {
            let _ = tx.send(std::thread::current().id());
        }));
        let ran_on = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(ran_on, production.delivery.thread_id());

        production.shutdown();
    }
}
