//! The public façade: `add`, the state-transition methods, `query`,
//! `is_connected`, `is_banned`, and the housekeeping entry point.
//!
//! Grounded on `book.rs`'s `AddressBook<Z, B>` — same shape (one struct
//! owning a store plus the collaborators it was constructed with, a set
//! of narrow public methods, no internal locking) generalized from
//! Monero's white/gray peer lists to the single `AddressStore` keyed by
//! identity that `spec.md` §3 describes.

use std::hash::Hash;
use std::time::Duration;

use crate::address::{PeerAddress, Protocol};
use crate::channel::{Channel, PlatformUtils};
use crate::clock::Clock;
use crate::constants;
use crate::error::{IllegalTransition, RejectReason, UnroutableMismatch};
use crate::events::EventBus;
use crate::housekeeper;
use crate::record::{Event, PeerRecord, ReduceOutcome, State};
use crate::store::AddressStore;

#[cfg(test)]
mod tests;

/// Static configuration read once at construction.
#[derive(Debug, Clone)]
pub struct BookConfig<K> {
    pub local_address: PeerAddress<K>,
}

/// The peer address book.
///
/// All methods are synchronous and run to completion without
/// suspending, matching `spec.md` §5: no operation awaits mid-sequence,
/// so there is nothing to lock.
pub struct Book<K, C, Clk, P> {
    store: AddressStore<K, C>,
    local_address: PeerAddress<K>,
    events: EventBus<K>,
    clock: Clk,
    platform: P,
}

impl<K, C, Clk, P> Book<K, C, Clk, P>
where
    K: Clone + Eq + Hash + std::fmt::Debug,
    C: Channel,
    Clk: Clock,
    P: PlatformUtils,
{
    /// Builds a fresh book and injects `seeds` via `add(None, seeds)`,
    /// exactly as `spec.md` §6 describes.
    pub fn new(cfg: BookConfig<K>, seeds: Vec<PeerAddress<K>>, clock: Clk, platform: P) -> Self {
        let mut book = Self {
            store: AddressStore::new(),
            local_address: cfg.local_address,
            events: EventBus::new(),
            clock,
            platform,
        };
        book.add(None, seeds);
        book
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&[PeerAddress<K>]) + 'static) {
        self.events.subscribe(callback);
    }

    pub fn connecting_count(&self) -> u32 {
        self.store.connecting_count()
    }

    // ---------------------------------------------------------------
    // §4.4 add
    // ---------------------------------------------------------------

    /// Admits `addresses` arriving over `channel` (`None` denotes a seed
    /// injection). Returns the number of addresses admitted and fires a
    /// single `added` event containing exactly those addresses.
    pub fn add(
        &mut self,
        channel: Option<C>,
        addresses: impl IntoIterator<Item = PeerAddress<K>>,
    ) -> usize {
        let now = self.clock.now_ms();
        let mut admitted = Vec::new();

        for address in addresses {
            if let Some(address) = self.try_admit(channel.as_ref(), address, now) {
                admitted.push(address);
            }
        }

        let count = admitted.len();
        self.events.fire_added(&admitted);
        count
    }

    /// Convenience for admitting a single address.
    pub fn add_one(&mut self, channel: Option<C>, address: PeerAddress<K>) -> bool {
        self.add(channel, std::iter::once(address)) == 1
    }

    fn try_admit(
        &mut self,
        channel: Option<&C>,
        mut address: PeerAddress<K>,
        now: u64,
    ) -> Option<PeerAddress<K>> {
        if address == self.local_address {
            self.log_reject(&address, RejectReason::IsLocalAddress);
            return None;
        }

        if channel.is_some() && address.exceeds_age(now) {
            self.log_reject(&address, RejectReason::ExceedsAge);
            return None;
        }

        if address.timestamp > now + constants::MAX_TIMESTAMP_DRIFT.as_millis() as u64 {
            self.log_reject(&address, RejectReason::TimestampDrift);
            return None;
        }

        if address.protocol == Protocol::Rtc {
            address.distance = address.distance.saturating_add(1);
            if address.distance > constants::MAX_DISTANCE {
                if let (Some(channel), Some(peer_id)) = (channel, address.peer_id.clone()) {
                    if let Some(record) = self.store.get_by_peer_id_mut(&peer_id) {
                        record.routes.delete_route(channel);
                    }
                }
                self.log_reject(&address, RejectReason::DistanceExceeded);
                return None;
            }
        }

        let key = address.identity_key.clone();

        if let Some(existing) = self.store.get(&key) {
            if existing.is_seed() {
                self.log_reject(&address, RejectReason::SeedImmutable);
                return None;
            }
            if existing.state == State::Banned {
                self.log_reject(&address, RejectReason::KnownBanned);
                return None;
            }
            if existing.protocol() == Protocol::Ws && existing.address.timestamp >= address.timestamp
            {
                self.log_reject(&address, RejectReason::StaleWsTimestamp);
                return None;
            }

            if address.net_address.is_none() {
                address.net_address = existing.address.net_address.clone();
            }

            let record = self.store.get_mut(&key).expect("just looked up");
            record.address = address.clone();

            if address.protocol == Protocol::Rtc {
                if let Some(channel) = channel {
                    record
                        .routes
                        .add_route(channel.clone(), address.distance, address.timestamp);
                }
                if let Some(peer_id) = address.peer_id.clone() {
                    self.store.put_peer_id(peer_id, key);
                }
            }
        } else {
            let mut record = PeerRecord::new(address.clone());
            if address.protocol == Protocol::Rtc {
                if let Some(channel) = channel {
                    record
                        .routes
                        .add_route(channel.clone(), address.distance, address.timestamp);
                }
            }
            self.store.insert(key.clone(), record);
            if let Some(peer_id) = address.peer_id.clone() {
                self.store.put_peer_id(peer_id, key);
            }
        }

        Some(address)
    }

    fn log_reject(&self, address: &PeerAddress<K>, reason: RejectReason) {
        tracing::debug!(key = ?address.identity_key, %reason, "add rejected");
    }

    // ---------------------------------------------------------------
    // §4.2 / §4.5 state transitions
    // ---------------------------------------------------------------

    /// Applies `event` to the record for `key`, keeping `connecting_count`
    /// in sync on every transition into or out of `Connecting`
    /// (`spec.md` §9's coupling note: decrement on *every* transition
    /// out, not only via `remove`).
    fn apply_reduce(&mut self, key: &K, event: Event<C>) -> Option<ReduceOutcome> {
        let Some(record) = self.store.get_mut(key) else {
            let reason = IllegalTransition::RecordAbsent;
            tracing::debug!(key = ?key, %reason, "illegal transition");
            return None;
        };
        let before = record.state;
        let outcome = record.reduce(&event);

        if outcome.is_legal() {
            let after = record.state;
            if before != State::Connecting && after == State::Connecting {
                self.store.inc_connecting();
            } else if before == State::Connecting && after != State::Connecting {
                self.store.dec_connecting();
            }
        } else {
            let reason = IllegalTransition::StateRefused;
            tracing::debug!(key = ?key, state = ?before, %reason, "illegal transition");
        }

        Some(outcome)
    }

    pub fn connecting(&mut self, key: &K) -> Option<()> {
        self.apply_reduce(key, Event::Connecting)?
            .is_legal()
            .then_some(())
    }

    /// Inbound `connected`. If no record exists yet a fresh `New` record
    /// is created and indexed first (`spec.md` §4.5 rule 1).
    pub fn connected(&mut self, channel: Option<C>, mut address: PeerAddress<K>) -> Option<()> {
        let now = self.clock.now_ms();
        let key = address.identity_key.clone();

        if !self.store.contains(&key) {
            let record = PeerRecord::new(address.clone());
            self.store.insert(key.clone(), record);
            if let Some(peer_id) = address.peer_id.clone() {
                self.store.put_peer_id(peer_id, key.clone());
            }
        }

        let outcome = self.apply_reduce(&key, Event::Connected)?;
        if !outcome.is_legal() {
            return None;
        }

        let record = self.store.get_mut(&key).expect("just ensured present");
        if address.net_address.is_none() {
            address.net_address = record.address.net_address.clone();
        }
        record.address = address.clone();
        record.last_connected = Some(now);
        record.failed_attempts = 0;
        record.ban_backoff = constants::INITIAL_FAILED_BACKOFF;

        if address.protocol == Protocol::Rtc {
            if let Some(channel) = channel {
                record
                    .routes
                    .add_route(channel, address.distance, address.timestamp);
            }
        }

        Some(())
    }

    /// Purges every RTC route that used `channel` as its signal across
    /// the whole store, removing any record that loses its last route,
    /// then applies the `disconnected` transition for `key`.
    pub fn disconnected(&mut self, channel: C, key: &K) -> Option<()> {
        self.purge_routes_for_channel(&channel);

        if !self.store.contains(key) {
            return None;
        }

        let outcome = self.apply_reduce(key, Event::Disconnected(channel.clone()))?;
        if !outcome.is_legal() {
            return None;
        }

        let Some(record) = self.store.get(key) else {
            // The purge above may have already removed this very record.
            return Some(());
        };
        let protocol = record.protocol();
        let closed_by_remote = channel.closed_by_remote();

        if (closed_by_remote && self.platform.is_online()) || protocol == Protocol::Dumb {
            self.remove(key);
        }

        Some(())
    }

    fn purge_routes_for_channel(&mut self, channel: &C) {
        let mut emptied = Vec::new();

        for (key, record) in self.store.iter_mut() {
            if record.routes.has_route() {
                record.routes.delete_route(channel);
                if !record.routes.has_route() {
                    emptied.push(key.clone());
                }
            }
        }

        for key in emptied {
            self.remove(&key);
        }
    }

    pub fn failure(&mut self, key: &K) -> Option<()> {
        let outcome = self.apply_reduce(key, Event::Failure)?;
        if !outcome.is_legal() {
            return None;
        }

        let record = self.store.get_mut(key).expect("record present");
        record.failed_attempts += 1;

        if record.failed_attempts >= record.max_failed_attempts {
            let backoff = record.ban_backoff;
            if backoff >= constants::MAX_FAILED_BACKOFF {
                self.remove(key);
            } else {
                self.apply_ban(key, Some(backoff));
                if let Some(record) = self.store.get_mut(key) {
                    record.ban_backoff = (record.ban_backoff * 2).min(constants::MAX_FAILED_BACKOFF);
                }
            }
        }

        Some(())
    }

    /// Requires the event's channel to equal the current best route's
    /// channel; otherwise this is a `Warning.UnroutableMismatch` no-op.
    pub fn unroutable(&mut self, channel: C, key: &K) -> Option<()> {
        let record = self.store.get_mut(key)?;

        let Some(best_channel) = record.routes.best_route().map(|r| r.signal_channel.clone())
        else {
            tracing::warn!(key = ?key, "unroutable: record has no route to compare against");
            return None;
        };

        if best_channel != channel {
            tracing::warn!(key = ?key, reason = %UnroutableMismatch, "unroutable rejected");
            return None;
        }

        let outcome = record.reduce(&Event::Unroutable(channel));
        debug_assert!(outcome.is_legal(), "unroutable is never illegal outside Banned");

        record.routes.delete_best_route();
        if !record.routes.has_route() {
            self.remove(key);
        }

        Some(())
    }

    /// Bans the peer at `address` for `duration` (defaulting to
    /// `DEFAULT_BAN_TIME`), creating a fresh record first if absent.
    pub fn ban(&mut self, address: PeerAddress<K>, duration: Option<Duration>) -> Option<()> {
        let key = address.identity_key.clone();

        if !self.store.contains(&key) {
            let record = PeerRecord::new(address.clone());
            self.store.insert(key.clone(), record);
            if let Some(peer_id) = address.peer_id.clone() {
                self.store.put_peer_id(peer_id, key.clone());
            }
        }

        self.apply_ban(&key, duration)
    }

    fn apply_ban(&mut self, key: &K, duration: Option<Duration>) -> Option<()> {
        let now = self.clock.now_ms();
        let duration = duration.unwrap_or(constants::DEFAULT_BAN_TIME);

        let outcome = self.apply_reduce(key, Event::Ban(duration))?;
        if !outcome.is_legal() {
            return None;
        }

        let record = self.store.get_mut(key).expect("record present");
        record.banned_until = Some(now + duration.as_millis() as u64);
        record.routes.delete_all();
        tracing::info!(key = ?key, until = record.banned_until, "peer banned");

        Some(())
    }

    /// Removes the record for `key`, with the seed/ban carve-outs in
    /// `spec.md` §4.5: seeds are rebanned rather than deleted, and
    /// records already `Banned` are left for housekeeping to reap.
    pub fn remove(&mut self, key: &K) -> Option<()> {
        let record = self.store.get(key)?;

        if record.is_seed() {
            let backoff = record.ban_backoff;
            self.apply_ban(key, Some(backoff));
            return Some(());
        }

        if record.state == State::Banned {
            return Some(());
        }

        let was_connecting = record.state == State::Connecting;
        self.store.remove(key);
        if was_connecting {
            self.store.dec_connecting();
        }

        Some(())
    }

    /// Removes `key` outright, bypassing `remove`'s seed and `Banned`
    /// carve-outs. Only for callers (the housekeeping sweep) that have
    /// already applied those carve-outs themselves — `housekeeper::sweep`
    /// only ever pushes a key to `SweepResult::to_remove` once it has
    /// determined the record is neither a seed nor eligible to return to
    /// `New`, so the Banned guard in `remove` would otherwise strand an
    /// expired, non-failure ban in `Banned` forever (`spec.md` §4.7).
    fn force_remove(&mut self, key: &K) {
        let Some(record) = self.store.get(key) else {
            return;
        };
        let was_connecting = record.state == State::Connecting;
        self.store.remove(key);
        if was_connecting {
            self.store.dec_connecting();
        }
    }

    // ---------------------------------------------------------------
    // §4.5 queries
    // ---------------------------------------------------------------

    pub fn is_connected(&self, key: &K) -> bool {
        self.store
            .get(key)
            .is_some_and(|r| r.state == State::Connected)
    }

    /// A banned seed never reports as banned to inbound-accept logic.
    pub fn is_banned(&self, key: &K) -> bool {
        self.store
            .get(key)
            .is_some_and(|r| r.state == State::Banned && !r.is_seed())
    }

    // ---------------------------------------------------------------
    // §4.6 query
    // ---------------------------------------------------------------

    /// Returns up to `max_addresses` addresses matching `protocol_mask`
    /// and `service_mask`, in store-iteration order, refreshing the best
    /// route timestamp of every `Connected` RTC record it visits.
    pub fn query(
        &mut self,
        protocol_mask: u8,
        service_mask: u8,
        max_addresses: usize,
    ) -> Vec<PeerAddress<K>> {
        let now = self.clock.now_ms();
        let mut results = Vec::with_capacity(max_addresses.min(self.store.len()));

        for record in self.store.values_mut() {
            if results.len() >= max_addresses {
                break;
            }
            if matches!(record.state, State::Banned | State::Failed) {
                continue;
            }
            if record.is_seed() {
                continue;
            }
            if record.address.protocol.bit() & protocol_mask == 0 {
                continue;
            }
            if record.address.services & service_mask == 0 {
                continue;
            }
            if record.address.exceeds_age(now) {
                continue;
            }

            if record.state == State::Connected {
                record.routes.refresh_best_timestamp(now);
            }

            results.push(record.address.clone());
        }

        results
    }

    /// `query` with `spec.md`'s default cap of 1000.
    pub fn query_default(&mut self, protocol_mask: u8, service_mask: u8) -> Vec<PeerAddress<K>> {
        self.query(protocol_mask, service_mask, constants::DEFAULT_MAX_ADDRESSES)
    }

    // ---------------------------------------------------------------
    // §4.7 housekeeping
    // ---------------------------------------------------------------

    /// Runs one housekeeping sweep at `now`, emitting `added` once for
    /// any seeds/failed peers that were reset this tick.
    pub fn tick(&mut self, now: u64) {
        let result = housekeeper::sweep(&mut self.store, now);

        for key in &result.to_remove {
            self.force_remove(key);
        }

        self.events.fire_added(&result.unbanned);
    }
}
