//! The time seam. Every age/ban/drift check goes through a [`Clock`]
//! instead of calling `SystemTime::now()` directly, so tests can drive
//! the book through scenarios at arbitrary instants without sleeping.

use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the current time, in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// The production clock, backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_millis() as u64
    }
}
