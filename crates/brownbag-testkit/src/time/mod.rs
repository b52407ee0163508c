//! Deterministic time sources

pub mod controllable_time;

pub use controllable_time::ControllableTimeSource;
