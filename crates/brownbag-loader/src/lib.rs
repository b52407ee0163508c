//! Brownbag Loader - Load-Content-Error engine
//!
//! Turns a [`Repository`](brownbag_core::Repository) into observable load
//! attempts. Each `invoke` produces `[Loading, terminal]`, or `[Loading]` when
//! the attempt is cancelled first.
//!
//! # Components
//!
//! - [`ContentLoader`]: starts attempts and owns the failure schedule
//! - [`CancellationHandle`]: idempotent cancel for one attempt
//! - [`AttemptPhase`]: per-attempt state machine
//! - [`LoadSession`]: caller-side retry helper
//!
//! # Example
//!
//! ```no_run
//! use brownbag_core::{ContentId, ContentState, LoaderConfig};
//! use brownbag_effects::ProductionEffects;
//! use brownbag_loader::ContentLoader;
//!
//! # async fn demo() -> brownbag_core::Result<()> {
//! let effects = ProductionEffects::start()?;
//! let loader = ContentLoader::from_fn(
//!     |id: Option<&ContentId>| id.map(|id| format!("post {id}")),
//!     effects.loader_effects(),
//!     LoaderConfig::demo(),
//! );
//! let handle = loader.invoke(Some("p1".into()), |state: ContentState<String>| {
//!     println!("{state:?}");
//! });
//! handle.cancel();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod attempt;
pub mod handle;
pub mod loader;
mod schedule;
pub mod session;

pub use attempt::{AttemptPhase, TransitionError};
pub use handle::CancellationHandle;
pub use loader::ContentLoader;
pub use session::LoadSession;
