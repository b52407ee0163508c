//! Brownbag Effects - Production Handlers
//!
//! Stateless or self-contained implementations of the effect traits defined
//! in `brownbag-core`:
//!
//! - [`time`]: tokio-backed and simulated clocks
//! - [`task`]: tracked tokio task spawner (background context)
//! - [`delivery`]: dedicated-thread serial delivery context
//! - [`repository`]: in-memory and blocking repositories
//! - [`composition`]: all production handlers bundled for a loader
//!
//! Deterministic test handlers live in `brownbag-testkit`.

#![forbid(unsafe_code)]

pub mod composition;
pub mod delivery;
pub mod repository;
pub mod task;
pub mod time;

pub use composition::ProductionEffects;
pub use delivery::SerialDeliveryContext;
pub use repository::{BlockingRepository, CollectionRepository, MemoryRepository};
pub use task::TokioTaskSpawner;
pub use time::{RealTimeHandler, SimulatedTimeHandler};
