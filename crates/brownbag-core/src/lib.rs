//! Brownbag Core - Content Loading Foundation
//!
//! This crate provides the pure types and effect interfaces that the content
//! loading subsystem is built from. It contains no runtime, no I/O and no
//! handler implementations.
//!
//! # Architecture Layers
//!
//! ## Core Types
//! - `ContentState<T>`: three-variant lifecycle value (`Loading`, `Content`, `Error`)
//! - `LoadError`: opaque cause carried by the `Error` state
//! - `ContentId`: identifier handed to a repository lookup
//!
//! ## Effect Interfaces (Pure Signatures)
//! - `TimeEffects`: artificial latency (`sleep_ms`)
//! - `TaskSpawner`, `CancellationToken`: background execution context
//! - `DeliveryContext`: serialized context for observer callbacks
//! - `Repository<T>`: abstract `lookup(id?) -> T | NotFound`
//! - `Observer<T>`: explicit callback receiving each `ContentState<T>`
//!
//! Handlers live in `brownbag-effects` (production) and `brownbag-testkit`
//! (deterministic).

#![forbid(unsafe_code)]

/// Loader configuration and failure-injection schedule
pub mod config;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Content identifiers
pub mod identifiers;

/// Observer registration contract
pub mod observer;

/// Lifecycle state delivered to observers
pub mod state;

pub use config::{ConfigError, FailureSchedule, LoaderConfig};
pub use effects::{
    repository_fn, CancellationToken, DeliveryContext, DeliveryJob, FnRepository, LoaderEffects,
    Repository, TaskSpawner, TimeEffects, TimeError,
};
pub use errors::{BrownbagError, Result};
pub use identifiers::ContentId;
pub use observer::Observer;
pub use state::{ContentState, LoadError};
