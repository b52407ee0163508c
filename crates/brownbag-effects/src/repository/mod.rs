//! Repository handlers
//!
//! Ready-made implementations of `brownbag_core::effects::Repository`. The
//! embedding application is free to supply its own.

pub mod blocking;
pub mod memory;

pub use blocking::BlockingRepository;
pub use memory::{CollectionRepository, MemoryRepository};
