//! The crate's only `tokio` runtime touchpoint: a periodic task that
//! drives [`Book::tick`].
//!
//! Grounded on `cuprate-address-book`'s `AddressBook::poll_save_to_disk`,
//! which fires off an `Interval` with `MissedTickBehavior::Skip` so a
//! stalled executor doesn't queue up a burst of catch-up ticks once it
//! resumes.

use std::hash::Hash;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::book::Book;
use crate::channel::{Channel, PlatformUtils};
use crate::clock::Clock;
use crate::constants::HOUSEKEEPING_INTERVAL;

/// Spawns a task that calls `book.tick(now)` on `HOUSEKEEPING_INTERVAL`,
/// forever, until the returned handle is dropped or aborted.
///
/// `now` is read from the wall clock directly rather than through the
/// book's injected [`Clock`]: the injected clock exists so tests can
/// control time deterministically, and a test never spawns this driver.
pub fn spawn_housekeeping<K, C, Clk, P>(mut book: Book<K, C, Clk, P>) -> JoinHandle<Book<K, C, Clk, P>>
where
    K: Clone + Eq + Hash + std::fmt::Debug + Send + 'static,
    C: Channel + Send + 'static,
    Clk: Clock + Send + 'static,
    P: PlatformUtils + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HOUSEKEEPING_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            book.tick(now_ms());
        }
    })
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}
