//! Periodic sweep: age-out, ban-expiry and route-timestamp refresh.
//!
//! Kept as a free function over [`AddressStore`] rather than a type with
//! its own state — `spec.md` §4.7 describes a stateless sweep, and the
//! production driver (see [`crate::driver`]) is the only thing that
//! needs to remember when the last tick ran. Grounded on the polling
//! style of `book.rs`'s `poll_connected_peers`/`AnchorList::poll_timeouts`,
//! generalized from "poll on `Context`" to "sweep given `now`" per
//! `spec.md` §9's `tick(now)` design note.

use std::hash::Hash;

use crate::address::PeerAddress;
use crate::record::State;
use crate::store::AddressStore;

/// The outcome of one housekeeping sweep.
pub struct SweepResult<K> {
    /// Keys the caller should pass through `Book::remove` — routed
    /// there (rather than deleted here) so the seed-durability
    /// invariant stays enforced in that one place.
    pub to_remove: Vec<K>,
    /// Addresses reset from `Banned` back to `New` this tick, to be
    /// emitted as a single `added` event.
    pub unbanned: Vec<PeerAddress<K>>,
}

/// Runs one housekeeping sweep over `store`, mutating ban/failure
/// counters and route timestamps in place. Does not itself delete any
/// record — see [`SweepResult::to_remove`].
pub fn sweep<K, C>(store: &mut AddressStore<K, C>, now: u64) -> SweepResult<K>
where
    K: Clone + Eq + Hash,
    C: Clone + PartialEq,
{
    let mut to_remove = Vec::new();
    let mut unbanned = Vec::new();

    let keys: Vec<K> = store.keys().cloned().collect();

    for key in keys {
        let Some(record) = store.get_mut(&key) else {
            continue;
        };

        match record.state {
            State::New | State::Tried | State::Failed => {
                if !record.is_seed() && record.address.exceeds_age(now) {
                    to_remove.push(key);
                    continue;
                }

                if record.state == State::Failed
                    && record.failed_attempts >= record.max_failed_attempts
                {
                    if let Some(banned_until) = record.banned_until {
                        if banned_until > 0 && banned_until <= now {
                            record.banned_until = None;
                            record.failed_attempts = 0;
                        }
                    }
                }
            }
            State::Banned => {
                let Some(banned_until) = record.banned_until else {
                    continue;
                };
                if banned_until > now {
                    continue;
                }

                let was_failure_ban = record.failed_attempts >= record.max_failed_attempts;
                if was_failure_ban || record.is_seed() {
                    record.state = State::New;
                    record.banned_until = None;
                    record.failed_attempts = 0;
                    tracing::info!(protocol = ?record.protocol(), "ban expired, returning to New");
                    unbanned.push(record.address.clone());
                } else {
                    to_remove.push(key);
                }
            }
            State::Connected => {
                record.routes.refresh_best_timestamp(now);
            }
            // Connecting peers are left untouched: the dialer owns its
            // own connect timeout (spec.md §9, open question).
            State::Connecting => {}
        }
    }

    SweepResult { to_remove, unbanned }
}
