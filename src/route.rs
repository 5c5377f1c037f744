//! Per-record relay routes for RTC peers.
//!
//! A [`RouteSet`] holds at most one [`Route`] per signal channel and
//! caches the current best route so `Book::query` and the dialer don't
//! have to re-scan on every read. Grounded on the small-N linear-scan
//! style `peer_list.rs` uses for its own indexes rather than reaching
//! for a heap — route counts per peer are bounded by the number of
//! signal channels we're connected to, never large.

use crate::constants::MAX_DISTANCE;

/// One relay path to an RTC peer.
#[derive(Debug, Clone)]
pub struct Route<C> {
    pub signal_channel: C,
    pub distance: u8,
    pub timestamp: u64,
}

/// The set of routes known for one RTC peer record.
#[derive(Debug, Default)]
pub struct RouteSet<C> {
    routes: Vec<Route<C>>,
    best: Option<usize>,
}

impl<C: PartialEq + Clone> RouteSet<C> {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            best: None,
        }
    }

    pub fn has_route(&self) -> bool {
        !self.routes.is_empty()
    }

    pub fn best_route(&self) -> Option<&Route<C>> {
        self.best.map(|idx| &self.routes[idx])
    }

    /// Upserts a route by channel identity, rejecting anything past the
    /// distance cap, then re-evaluates the best route.
    pub fn add_route(&mut self, channel: C, distance: u8, timestamp: u64) {
        if distance > MAX_DISTANCE {
            return;
        }

        if let Some(existing) = self.routes.iter_mut().find(|r| r.signal_channel == channel) {
            existing.distance = distance;
            existing.timestamp = timestamp;
        } else {
            self.routes.push(Route {
                signal_channel: channel,
                distance,
                timestamp,
            });
        }

        self.recompute_best();
    }

    /// Removes the route over `channel`, if any.
    pub fn delete_route(&mut self, channel: &C) {
        self.routes.retain(|r| &r.signal_channel != channel);
        self.recompute_best();
    }

    /// Removes the current best route.
    pub fn delete_best_route(&mut self) {
        if let Some(idx) = self.best {
            self.routes.remove(idx);
            self.recompute_best();
        }
    }

    pub fn delete_all(&mut self) {
        self.routes.clear();
        self.best = None;
    }

    /// Refreshes the timestamp on the current best route to `now`,
    /// keeping our view of relay freshness current (`spec.md` §4.6).
    pub fn refresh_best_timestamp(&mut self, now: u64) {
        if let Some(idx) = self.best {
            self.routes[idx].timestamp = now;
        }
    }

    /// Best-route ordering: `(distance ASC, timestamp DESC)`.
    fn recompute_best(&mut self) {
        self.best = self
            .routes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance
                    .cmp(&b.distance)
                    .then(b.timestamp.cmp(&a.timestamp))
            })
            .map(|(idx, _)| idx);
    }
}
