//! Dialer-facing ranking over the address store.
//!
//! `spec.md` §2 marks this a stub in the original source; it is kept
//! that way here — a pure, read-only function over already-admitted
//! addresses, with no state of its own, grounded on the teacher's
//! `get_white_peers`/`take_random_white_peer` read paths which likewise
//! never mutate the store they read from (besides the route-timestamp
//! refresh `query` itself performs).

use std::hash::Hash;

use rand::seq::SliceRandom;

use crate::address::PeerAddress;
use crate::record::{PeerRecord, State};

/// A candidate's score: higher is preferred. Connected/recently-tried
/// peers and low-distance RTC relays score higher; this is intentionally
/// simple — real ranking is a dialer concern this crate only feeds.
pub fn score<K: Clone + Eq + Hash, C: Clone + PartialEq>(record: &PeerRecord<K, C>) -> i64 {
    let mut score: i64 = 0;

    match record.state {
        State::Connected => score += 100,
        State::Tried => score += 10,
        State::New => score += 5,
        State::Failed | State::Banned | State::Connecting => {}
    }

    if let Some(route) = record.routes.best_route() {
        score += i64::from(crate::constants::MAX_DISTANCE - route.distance) * 5;
    }

    score -= i64::from(record.failed_attempts) * 15;

    score
}

/// Sorts `candidates` by descending [`score`], stable on ties.
pub fn rank<'a, K: Clone + Eq + Hash, C: Clone + PartialEq>(
    candidates: &mut Vec<(&'a PeerAddress<K>, &'a PeerRecord<K, C>)>,
) {
    candidates.sort_by(|(_, a), (_, b)| score(b).cmp(&score(a)));
}

/// Picks one candidate at random from `candidates`, matching the
/// teacher's `take_random_white_peer` behavior for a dialer that wants
/// variety rather than always dialing the top-ranked peer.
pub fn pick_random<'a, K, C>(candidates: &[&'a PeerAddress<K>]) -> Option<&'a PeerAddress<K>> {
    candidates.choose(&mut rand::thread_rng()).copied()
}
