//! Core Effect Trait Definitions
//!
//! Pure trait definitions for every side effect the content loader performs.
//! This module defines **what** effects can be performed; handlers define **how**.
//!
//! # Effect Classification
//!
//! ## Infrastructure Effects (`brownbag-effects`)
//! - **Time**: artificial latency before terminal delivery
//! - **Task**: background execution context for lookup and delay
//! - **Delivery**: single serialized context for observer callbacks
//!
//! ## Application Effects (supplied by the embedding application)
//! - **Repository**: `lookup(id?) -> T | NotFound`
//!
//! ## Composite Effects
//! - **LoaderEffects**: time + task + delivery, handed to a loader at construction
//!
//! ## Testing Effects (`brownbag-testkit`)
//! Deterministic handlers that collapse the delay to zero and run both
//! execution contexts synchronously, or hold them for step-by-step control.

pub mod composite;
pub mod delivery;
pub mod repository;
pub mod task;
pub mod time;

pub use composite::LoaderEffects;
pub use delivery::{DeliveryContext, DeliveryJob};
pub use repository::{repository_fn, FnRepository, Repository};
pub use task::{CancellationToken, TaskSpawner};
pub use time::{TimeEffects, TimeError};
