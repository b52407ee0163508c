//! Time effect handlers
//!
//! Standard implementations of the `TimeEffects` trait defined in
//! `brownbag-core`.

pub mod real;
pub mod simulated;

pub use real::RealTimeHandler;
pub use simulated::SimulatedTimeHandler;
