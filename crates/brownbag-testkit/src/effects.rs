//! Ready-made effect bundles for loader tests.

use crate::execution::{InlineDeliveryContext, InlineTaskSpawner, ManualDeliveryContext};
use crate::time::ControllableTimeSource;
use brownbag_core::effects::LoaderEffects;
use brownbag_effects::{SimulatedTimeHandler, TokioTaskSpawner};
use std::sync::Arc;

/// Zero-delay, fully synchronous effects.
///
/// `invoke` returns only after the terminal state was delivered, on the
/// calling thread.
pub fn immediate_effects() -> LoaderEffects {
    LoaderEffects::new(
        Arc::new(SimulatedTimeHandler::new_at_epoch()),
        Arc::new(InlineTaskSpawner),
        Arc::new(InlineDeliveryContext),
    )
}

/// Effects whose clock and delivery queue are driven by the test.
///
/// Background work runs on the current tokio runtime; the delay only ends
/// when the test advances `time`, and terminal states only reach observers
/// when the test drains `delivery`.
#[derive(Clone)]
pub struct ControlledEffects {
    /// Clock advanced by the test
    pub time: ControllableTimeSource,
    /// Queue drained by the test
    pub delivery: ManualDeliveryContext,
    /// Background context on the test runtime
    pub spawner: Arc<TokioTaskSpawner>,
}

impl ControlledEffects {
    /// Type-erased bundle for `ContentLoader::new`.
    pub fn loader_effects(&self) -> LoaderEffects {
        LoaderEffects::new(
            Arc::new(self.time.clone()),
            self.spawner.clone(),
            Arc::new(self.delivery.clone()),
        )
    }
}

/// Build [`ControlledEffects`] on the current tokio runtime.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn controlled_effects() -> ControlledEffects {
    let spawner = TokioTaskSpawner::new().expect("controlled effects need a tokio runtime");
    ControlledEffects {
        time: ControllableTimeSource::new(0),
        delivery: ManualDeliveryContext::new(),
        spawner: Arc::new(spawner),
    }
}
