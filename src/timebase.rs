//! Timebase trait for clock sources

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of "now" for the race clock.
///
/// The engine never calls `Instant::now()` directly, so a session can be
/// driven by the wall clock or replayed deterministically.
pub trait Timebase: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Wall-clock timebase backed by the monotonic OS clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimebase;

impl Timebase for SystemTimebase {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Timebase that only moves when told to.
///
/// Clones share the same position, so a handle kept outside a session can
/// advance the clock the session sees.
#[derive(Debug, Clone)]
pub struct ManualTimebase {
    origin: Instant,
    offset_micros: Arc<AtomicU64>,
}

impl ManualTimebase {
    pub fn new() -> Self {
        Self { origin: Instant::now(), offset_micros: Arc::new(AtomicU64::new(0)) }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let micros = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        self.offset_micros.fetch_add(micros, Ordering::SeqCst);
    }

    /// Time elapsed since the timebase was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.offset_micros.load(Ordering::SeqCst))
    }
}

impl Default for ManualTimebase {
    fn default() -> Self {
        Self::new()
    }
}

impl Timebase for ManualTimebase {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}
