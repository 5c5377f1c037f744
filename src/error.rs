//! Observable-but-not-raised error kinds.
//!
//! `spec.md` §7: "the book does not raise errors across its boundary...
//! A malformed event from a faulty peer must not crash the node." These
//! variants exist purely so rejections can be logged with a reason; the
//! public API still returns `bool`/`Option<()>` sentinels, grounded on
//! the teacher's `AddressBookError` but kept internal to this crate.
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("address equals the local address")]
    IsLocalAddress,
    #[error("address exceeds its protocol's maximum age")]
    ExceedsAge,
    #[error("address timestamp is too far in the future")]
    TimestampDrift,
    #[error("RTC distance would exceed the hop cap")]
    DistanceExceeded,
    #[error("known address is banned")]
    KnownBanned,
    #[error("address is an immutable seed")]
    SeedImmutable,
    #[error("WS address is not fresher than the known one")]
    StaleWsTimestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalTransition {
    #[error("no record exists for this address")]
    RecordAbsent,
    #[error("event is illegal in the record's current state")]
    StateRefused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unroutable arrived on a non-best-route channel")]
pub struct UnroutableMismatch;
