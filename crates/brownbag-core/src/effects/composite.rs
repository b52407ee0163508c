//! Composite effect bundle consumed by the content loader.

use super::{DeliveryContext, TaskSpawner, TimeEffects};
use std::fmt;
use std::sync::Arc;

/// The three capabilities a loader needs: a clock for the artificial delay,
/// a background context and a delivery context.
#[derive(Clone)]
pub struct LoaderEffects {
    /// Clock used for the artificial delay
    pub time: Arc<dyn TimeEffects>,
    /// Background context for lookup and delay
    pub spawner: Arc<dyn TaskSpawner>,
    /// Serialized context for terminal callbacks
    pub delivery: Arc<dyn DeliveryContext>,
}

impl LoaderEffects {
    /// Bundle the three handlers
    pub fn new(
        time: Arc<dyn TimeEffects>,
        spawner: Arc<dyn TaskSpawner>,
        delivery: Arc<dyn DeliveryContext>,
    ) -> Self {
        Self {
            time,
            spawner,
            delivery,
        }
    }
}

impl fmt::Debug for LoaderEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderEffects").finish_non_exhaustive()
    }
}
