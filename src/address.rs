//! [`PeerAddress`] and the transport [`Protocol`] it carries.
//!
//! Addresses are supplied to the book by its collaborators (the network
//! layer and its transports); the book never constructs one except for
//! merges performed inside `Book::add`.

use std::hash::Hash;

use crate::constants;

/// The transport family an address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_config", derive(serde::Serialize, serde::Deserialize))]
pub enum Protocol {
    /// A direct websocket-style server.
    Ws,
    /// A browser-relayed WebRTC peer, reached through a signal channel.
    Rtc,
    /// A dumb, outbound-only client.
    Dumb,
}

impl Protocol {
    /// Bit used by this protocol in a `protocol_mask`.
    pub const fn bit(self) -> u8 {
        match self {
            Self::Ws => 0b001,
            Self::Rtc => 0b010,
            Self::Dumb => 0b100,
        }
    }
}

/// A bitmask matching every protocol; convenience for callers of `query`.
pub const ALL_PROTOCOLS: u8 = Protocol::Ws.bit() | Protocol::Rtc.bit() | Protocol::Dumb.bit();

/// A peer address as seen by the address book.
///
/// `identity_key` is opaque to the book: it is never inspected beyond
/// equality, matching `spec.md`'s exclusion of cryptographic identity
/// verification from this crate's scope.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_config", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerAddress<K> {
    pub protocol: Protocol,
    pub identity_key: K,
    /// Bitset of services this peer advertises.
    pub services: u8,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// The reachable network address, if known.
    pub net_address: Option<String>,
    /// Relay hop count; only meaningful for RTC addresses.
    pub distance: u8,
    /// The relay-peer id used to index RTC addresses; `None` otherwise.
    pub peer_id: Option<K>,
}

impl<K: Clone + Eq + Hash> PartialEq for PeerAddress<K> {
    fn eq(&self, other: &Self) -> bool {
        self.identity_key == other.identity_key
    }
}
impl<K: Clone + Eq + Hash> Eq for PeerAddress<K> {}

impl<K: Clone + Eq + Hash> PeerAddress<K> {
    /// A seed address never ages out and is exempt from the freshness
    /// checks applied to regular addresses.
    pub fn is_seed(&self) -> bool {
        self.timestamp == 0
    }

    /// Whether this address has aged past its protocol's maximum age,
    /// relative to `now` (milliseconds since epoch).
    pub fn exceeds_age(&self, now: u64) -> bool {
        let max_age_ms = constants::max_age(self.protocol).as_millis() as u64;
        now.saturating_sub(self.timestamp) > max_age_ms
    }
}
