//! Clock abstraction for deterministic time.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Abstraction over system time for deterministic behavior.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A clock that follows real time until it is overridden.
///
/// Clones share the same override, so every holder observes `set`,
/// `advance` and `reset` at once.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    overridden: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl ManualClock {
    /// Creates a clock that follows real time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock already pinned to `instant`.
    pub fn at(instant: DateTime<Utc>) -> Self {
        let clock = Self::new();
        clock.set(instant);
        clock
    }

    /// Pins the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut guard = self.overridden.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(instant);
    }

    /// Moves the clock forward by `duration`, pinning it first if needed.
    pub fn advance(&self, duration: Duration) {
        let mut guard = self.overridden.write().unwrap_or_else(|e| e.into_inner());
        let base = (*guard).unwrap_or_else(Utc::now);
        *guard = Some(base + duration);
    }

    /// Returns the clock to real time.
    pub fn reset(&self) {
        let mut guard = self.overridden.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Returns true while the clock is pinned.
    pub fn is_overridden(&self) -> bool {
        self.overridden
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let guard = self.overridden.read().unwrap_or_else(|e| e.into_inner());
        (*guard).unwrap_or_else(Utc::now)
    }
}
