//! Content loader: one `invoke`, one attempt, `[Loading, terminal]`.
//!
//! `invoke` emits `Loading` synchronously, then hands the attempt to the
//! background context. The background task looks the value up, waits out the
//! artificial delay (raced against cancellation), and enqueues the terminal
//! delivery on the delivery context. The failure schedule is consulted only
//! inside that delivery, after the cancellation check.

use crate::attempt::Attempt;
use crate::handle::CancellationHandle;
use crate::schedule::FailureInjector;
use brownbag_core::effects::{repository_fn, CancellationToken, LoaderEffects, Repository};
use brownbag_core::{ContentId, ContentState, LoadError, LoaderConfig, Observer};
use futures::future::{self, Either};
use futures::pin_mut;
use std::fmt;
use std::sync::Arc;

struct LoaderInner<T> {
    repository: Arc<dyn Repository<T>>,
    effects: LoaderEffects,
    config: LoaderConfig,
    injector: FailureInjector,
}

/// Loader for one kind of content.
///
/// Clones share the repository, the effects and the failure schedule; two
/// loaders built separately never see each other's schedule.
pub struct ContentLoader<T> {
    inner: Arc<LoaderInner<T>>,
}

impl<T> Clone for ContentLoader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ContentLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentLoader")
            .field("config", &self.inner.config)
            .field("delivered_attempts", &self.inner.injector.delivered())
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> ContentLoader<T> {
    /// Build a loader over a repository.
    pub fn new(
        repository: Arc<dyn Repository<T>>,
        effects: LoaderEffects,
        config: LoaderConfig,
    ) -> Self {
        let injector = FailureInjector::new(config.failure_schedule.clone());
        Self {
            inner: Arc::new(LoaderInner {
                repository,
                effects,
                config,
                injector,
            }),
        }
    }

    /// Build a loader around a plain lookup closure.
    pub fn from_fn<F>(lookup: F, effects: LoaderEffects, config: LoaderConfig) -> Self
    where
        F: Fn(Option<&ContentId>) -> Option<T> + Send + Sync + 'static,
    {
        Self::new(Arc::new(repository_fn::<T, F>(lookup)), effects, config)
    }

    /// Start one load attempt.
    ///
    /// `observer` receives `Loading` before this returns. The terminal state,
    /// if the attempt is not cancelled first, arrives on the delivery context.
    pub fn invoke<O>(&self, id: Option<ContentId>, observer: O) -> CancellationHandle
    where
        O: Observer<T>,
    {
        self.invoke_shared(id, Arc::new(observer))
    }

    /// Like [`invoke`](Self::invoke), for an observer shared between attempts.
    pub fn invoke_shared(
        &self,
        id: Option<ContentId>,
        observer: Arc<dyn Observer<T>>,
    ) -> CancellationHandle {
        let attempt = Arc::new(Attempt::new(id, observer));
        tracing::debug!(
            attempt_id = %attempt.id(),
            id = ?attempt.content_id(),
            delay_ms = self.inner.config.delay_ms,
            "invoking content loader"
        );

        attempt.begin();
        let handle = CancellationHandle::new(attempt.clone());

        let inner = Arc::clone(&self.inner);
        self.inner
            .effects
            .spawner
            .spawn(Box::pin(run_attempt(inner, attempt)));
        handle
    }

    /// Attempts that reached a terminal delivery through this loader.
    pub fn delivered_attempts(&self) -> u64 {
        self.inner.injector.delivered()
    }

    /// Configuration the loader was built with.
    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }
}

async fn run_attempt<T: Send + 'static>(inner: Arc<LoaderInner<T>>, attempt: Arc<Attempt<T>>) {
    let attempt_id = attempt.id();
    if attempt.is_cancelled() {
        tracing::info!(%attempt_id, "attempt cancelled before lookup; terminal suppressed");
        return;
    }

    let value = inner.repository.lookup(attempt.content_id()).await;

    let delay_ms = inner.config.delay_ms;
    tracing::trace!(%attempt_id, delay_ms, "delay started");
    let clock = {
        let sleep = inner.effects.time.sleep_ms(delay_ms);
        let cancelled = attempt.cancelled();
        pin_mut!(sleep);
        pin_mut!(cancelled);
        match future::select(sleep, cancelled).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                tracing::info!(%attempt_id, "attempt cancelled during delay; terminal suppressed");
                return;
            }
        }
    };
    tracing::trace!(%attempt_id, "delay finished");

    let outcome = match clock {
        Err(e) => {
            tracing::warn!(%attempt_id, error = %e, "clock failed during delay");
            ContentState::Error(LoadError::Clock {
                reason: e.to_string(),
            })
        }
        Ok(()) => match value {
            Some(value) => ContentState::Content(value),
            None => ContentState::Error(LoadError::not_found(attempt.content_id().cloned())),
        },
    };

    let job_inner = Arc::clone(&inner);
    let job_attempt = Arc::clone(&attempt);
    inner.effects.delivery.deliver(Box::new(move || {
        let delivered = job_attempt.deliver_with(|| {
            let ticket = job_inner.injector.record_delivery();
            let state = if ticket.inject {
                ContentState::Error(ticket.error())
            } else {
                outcome
            };
            tracing::debug!(
                %attempt_id,
                id = ?job_attempt.content_id(),
                ordinal = ticket.ordinal,
                injected = ticket.inject,
                is_error = state.is_error(),
                "delivering terminal state"
            );
            state
        });
        if !delivered {
            tracing::info!(%attempt_id, "attempt cancelled before delivery; terminal suppressed");
        }
    }));
}
