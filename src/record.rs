//! The per-peer state machine.
//!
//! `spec.md` §9 (REDESIGN FLAG #1) replaces the original's function-
//! pointer dispatch with an explicit tagged [`Event`], reduced by
//! [`PeerRecord::reduce`] against the transition table in `spec.md` §4.2.
//! `reduce` only ever touches `state`; the counters, timestamps and
//! routes it implies are the caller's (`Book`'s) responsibility to
//! apply as the documented post-reducer effects.

use std::time::Duration;

use crate::address::{PeerAddress, Protocol};
use crate::constants;
use crate::route::RouteSet;

/// The peer's place in the connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    New,
    Connecting,
    Connected,
    Tried,
    Failed,
    Banned,
}

/// An event driving the state machine, mirroring the Book's public
/// transition methods one-for-one.
#[derive(Debug, Clone)]
pub enum Event<C> {
    Connecting,
    Connected,
    Disconnected(C),
    Failure,
    Unroutable(C),
    Ban(Duration),
}

/// Result of applying an [`Event`] to a record's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOutcome {
    /// The event was legal and the state changed.
    Applied,
    /// The event was legal but left the state unchanged.
    NoChange,
    /// The event is illegal in the record's current state; no effect.
    Illegal,
}

impl ReduceOutcome {
    pub fn is_legal(self) -> bool {
        !matches!(self, Self::Illegal)
    }
}

/// A single peer's bookkeeping: address, state machine, failure/ban
/// counters and (for RTC peers) its relay routes.
#[derive(Debug)]
pub struct PeerRecord<K, C> {
    pub address: PeerAddress<K>,
    pub state: State,
    pub failed_attempts: u32,
    pub max_failed_attempts: u32,
    pub banned_until: Option<u64>,
    pub ban_backoff: Duration,
    pub last_connected: Option<u64>,
    pub routes: RouteSet<C>,
}

impl<K: Clone + Eq + std::hash::Hash, C: PartialEq + Clone> PeerRecord<K, C> {
    /// A fresh `New` record for `address`, with protocol-appropriate
    /// failure ceiling and the initial ban backoff.
    pub fn new(address: PeerAddress<K>) -> Self {
        let max_failed_attempts = constants::max_failed_attempts(address.protocol);
        Self {
            address,
            state: State::New,
            failed_attempts: 0,
            max_failed_attempts,
            banned_until: None,
            ban_backoff: constants::INITIAL_FAILED_BACKOFF,
            last_connected: None,
            routes: RouteSet::new(),
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.address.protocol
    }

    pub fn is_seed(&self) -> bool {
        self.address.is_seed()
    }

    /// Applies the transition table in `spec.md` §4.2. Mutates `state`
    /// only; counters/timestamps/routes are the caller's job.
    pub fn reduce(&mut self, event: &Event<C>) -> ReduceOutcome {
        use Event::*;
        use ReduceOutcome::*;
        use State::*;

        if self.state == Banned {
            return match event {
                Ban(_) => NoChange,
                _ => Illegal,
            };
        }

        match (self.state, event) {
            (New, Connecting) => {
                self.state = State::Connecting;
                Applied
            }
            (New, Connected) => {
                self.state = State::Connected;
                Applied
            }
            (New, Disconnected(_)) => Illegal,
            (New, Failure) => {
                self.state = State::Failed;
                Applied
            }
            (New, Unroutable(_)) => NoChange,
            (New, Ban(_)) => {
                self.state = State::Banned;
                Applied
            }

            (Connecting, Connecting) => NoChange,
            (Connecting, Connected) => {
                self.state = State::Connected;
                Applied
            }
            (Connecting, Disconnected(_)) => {
                self.state = State::Tried;
                Applied
            }
            (Connecting, Failure) => {
                self.state = State::Failed;
                Applied
            }
            (Connecting, Unroutable(_)) => NoChange,
            (Connecting, Ban(_)) => {
                self.state = State::Banned;
                Applied
            }

            (Connected, Connecting) => Illegal,
            (Connected, Connected) => NoChange,
            (Connected, Disconnected(_)) => {
                self.state = State::Tried;
                Applied
            }
            (Connected, Failure) => {
                self.state = State::Failed;
                Applied
            }
            (Connected, Unroutable(_)) => NoChange,
            (Connected, Ban(_)) => {
                self.state = State::Banned;
                Applied
            }

            (Tried, Connecting) => {
                self.state = State::Connecting;
                Applied
            }
            (Tried, Connected) => {
                self.state = State::Connected;
                Applied
            }
            (Tried, Disconnected(_)) => NoChange,
            (Tried, Failure) => {
                self.state = State::Failed;
                Applied
            }
            (Tried, Unroutable(_)) => NoChange,
            (Tried, Ban(_)) => {
                self.state = State::Banned;
                Applied
            }

            (Failed, Connecting) => {
                self.state = State::Connecting;
                Applied
            }
            (Failed, Connected) => {
                self.state = State::Connected;
                Applied
            }
            (Failed, Disconnected(_)) => NoChange,
            (Failed, Failure) => NoChange,
            (Failed, Unroutable(_)) => NoChange,
            (Failed, Ban(_)) => {
                self.state = State::Banned;
                Applied
            }

            (Banned, _) => unreachable!("handled above"),
        }
    }
}
