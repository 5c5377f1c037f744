//! Peer Address Book
//!
//! This crate holds the in-memory registry a P2P node uses to discover,
//! rank, age and gate connections to remote peers across heterogeneous
//! transports: direct websocket-style servers, browser-relayed WebRTC
//! peers reached through intermediate signal channels, and dumb
//! outbound-only clients.
//!
//! It does not touch the wire: serialization of addresses, the
//! concrete transport stacks, consensus/sync logic and process
//! bootstrap are all external collaborators. The book consumes only an
//! opaque [`Channel`] handle and a [`PeerAddress`] supplied by the
//! caller, and emits a single `added` event back out.
//!
//! Like `cuprate-address-book`, every public operation on [`Book`] is
//! synchronous and runs on the caller's event loop; only the production
//! housekeeping loop in [`driver`] touches `tokio` directly.

mod address;
mod book;
mod channel;
mod clock;
mod constants;
mod driver;
mod error;
mod events;
mod housekeeper;
mod record;

pub mod route;
mod service;
mod store;

pub mod scoring;
pub mod testing;

pub use address::{Protocol, ALL_PROTOCOLS};
pub use book::{Book, BookConfig};
pub use channel::{Channel, PlatformUtils};
pub use clock::{Clock, SystemClock};
pub use constants::*;
pub use driver::spawn_housekeeping;
pub use error::{IllegalTransition, RejectReason, UnroutableMismatch};
pub use record::{PeerRecord, State};
pub use service::{BookRequest, BookResponse, BookService};

/// Re-exported so downstream crates don't need their own dependency on
/// the address type's generic bound.
pub use address::PeerAddress;
