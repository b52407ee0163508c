//! Per-loader failure injection.
//!
//! Owns the loader's delivered-attempt counter. The counter only advances
//! from inside an attempt's delivery critical section, so cancelled attempts
//! never consume an ordinal.

use brownbag_core::{FailureSchedule, LoadError};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub(crate) struct FailureInjector {
    schedule: FailureSchedule,
    delivered: AtomicU64,
}

/// Outcome of recording one delivered attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    /// 1-based ordinal of this delivery
    pub ordinal: u64,
    /// Whether the schedule forces this delivery to fail
    pub inject: bool,
}

impl Ticket {
    pub(crate) fn error(self) -> LoadError {
        LoadError::Injected {
            attempt: self.ordinal,
        }
    }
}

impl FailureInjector {
    pub(crate) fn new(schedule: FailureSchedule) -> Self {
        Self {
            schedule,
            delivered: AtomicU64::new(0),
        }
    }

    /// Count one delivered attempt and decide whether it is forced to fail.
    pub(crate) fn record_delivery(&self) -> Ticket {
        let ordinal = self.delivered.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            ordinal,
            inject: self.schedule.should_fail(ordinal),
        }
    }

    pub(crate) fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }
}
