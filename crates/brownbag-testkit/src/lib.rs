//! Brownbag Testing Infrastructure
//!
//! Deterministic handlers and fixtures for exercising the content loader
//! without real latency or real threads.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```rust,no_run
//! use brownbag_testkit::*;
//!
//! #[test]
//! fn my_test() {
//!     let effects = immediate_effects();
//!     let observer = RecordingObserver::<Post>::new();
//!     // build a ContentLoader with `effects`, invoke with `observer.clone()`
//! }
//! ```

pub mod effects;
pub mod execution;
pub mod fixtures;
pub mod observer;
pub mod time;

pub use effects::{controlled_effects, immediate_effects, ControlledEffects};
pub use execution::{InlineDeliveryContext, InlineTaskSpawner, ManualDeliveryContext};
pub use fixtures::{post, post_collection, post_repository, sample_posts, Post, Publication};
pub use observer::RecordingObserver;
pub use time::ControllableTimeSource;
