//! Test doubles for the [`Clock`], [`Channel`] and [`PlatformUtils`]
//! seams, plus small [`PeerAddress`] builders.
//!
//! Grounded on `cuprate_test_utils::test_netzone`'s `TestNetZone` /
//! `TestNetZoneAddr`: a minimal fixture type per abstract collaborator,
//! public so downstream crates embedding this book can reuse it in their
//! own tests instead of hand-rolling equivalents.

use std::cell::Cell;

use crate::address::{PeerAddress, Protocol};
use crate::channel::{Channel, PlatformUtils};
use crate::clock::Clock;

/// A [`Clock`] whose reading is set explicitly by the test, advanced
/// with [`TestClock::advance`].
#[derive(Debug, Default)]
pub struct TestClock(Cell<u64>);

impl TestClock {
    pub fn new(now_ms: u64) -> Self {
        Self(Cell::new(now_ms))
    }

    pub fn set(&self, now_ms: u64) {
        self.0.set(now_ms);
    }

    pub fn advance(&self, by_ms: u64) {
        self.0.set(self.0.get() + by_ms);
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// A [`Channel`] identified by a small integer, with remote-close
/// flagged out of band by the test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestChannel {
    pub id: u64,
    pub closed_by_remote: bool,
}

impl TestChannel {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            closed_by_remote: false,
        }
    }

    pub fn closed(id: u64) -> Self {
        Self {
            id,
            closed_by_remote: true,
        }
    }
}

impl Channel for TestChannel {
    fn closed_by_remote(&self) -> bool {
        self.closed_by_remote
    }
}

/// A [`PlatformUtils`] reporting a fixed online/offline state.
#[derive(Debug, Clone, Copy)]
pub struct TestPlatform {
    pub online: bool,
}

impl TestPlatform {
    pub fn online() -> Self {
        Self { online: true }
    }

    pub fn offline() -> Self {
        Self { online: false }
    }
}

impl PlatformUtils for TestPlatform {
    fn is_online(&self) -> bool {
        self.online
    }
}

/// Builds a regular (non-seed) [`PeerAddress`] with `timestamp` set to
/// `now`, matching what a live transport would hand the book.
pub fn fresh_address(protocol: Protocol, key: u64, now: u64) -> PeerAddress<u64> {
    PeerAddress {
        protocol,
        identity_key: key,
        services: 0xFF,
        timestamp: now,
        net_address: Some(format!("10.0.0.{key}:18080")),
        distance: 0,
        peer_id: None,
    }
}

/// Builds an RTC address reached through `peer_id`, at `distance` hops.
pub fn rtc_address(key: u64, peer_id: u64, distance: u8, now: u64) -> PeerAddress<u64> {
    PeerAddress {
        protocol: Protocol::Rtc,
        identity_key: key,
        services: 0xFF,
        timestamp: now,
        net_address: None,
        distance,
        peer_id: Some(peer_id),
    }
}

/// Builds a seed address (`timestamp == 0`), permanently immutable once
/// admitted.
pub fn seed_address(protocol: Protocol, key: u64) -> PeerAddress<u64> {
    PeerAddress {
        protocol,
        identity_key: key,
        services: 0xFF,
        timestamp: 0,
        net_address: Some(format!("10.0.0.{key}:18080")),
        distance: 0,
        peer_id: None,
    }
}
