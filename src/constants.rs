//! Tunable constants governing aging, distance and ban policy.
//!
//! Mirrors `spec.md` §6 verbatim; kept as one module so the policy knobs
//! are easy to audit in one place, the way `cuprate_p2p_core` centralizes
//! its protocol constants.

use std::time::Duration;

/// Maximum age of a WS address before it is no longer admissible.
pub const MAX_AGE_WS: Duration = Duration::from_secs(30 * 60);
/// Maximum age of an RTC address before it is no longer admissible.
pub const MAX_AGE_RTC: Duration = Duration::from_secs(10 * 60);
/// Maximum age of a DUMB address before it is no longer admissible.
pub const MAX_AGE_DUMB: Duration = Duration::from_secs(60);

/// Hop-count cap for relayed RTC addresses and their routes.
pub const MAX_DISTANCE: u8 = 4;

/// Maximum amount an incoming address's timestamp may sit in the future.
pub const MAX_TIMESTAMP_DRIFT: Duration = Duration::from_secs(10 * 60);

/// Failed-attempt ceiling before a WS peer escalates to a ban.
pub const MAX_FAILED_ATTEMPTS_WS: u32 = 3;
/// Failed-attempt ceiling before an RTC peer escalates to a ban.
pub const MAX_FAILED_ATTEMPTS_RTC: u32 = 2;

/// How often the housekeeper sweeps the store.
pub const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(60);

/// Ban duration used when no explicit duration is supplied.
pub const DEFAULT_BAN_TIME: Duration = Duration::from_secs(10 * 60);

/// Starting backoff applied to the first failure-driven ban.
pub const INITIAL_FAILED_BACKOFF: Duration = Duration::from_secs(15);
/// Ceiling the doubling backoff saturates at.
pub const MAX_FAILED_BACKOFF: Duration = Duration::from_secs(10 * 60);

/// Default cap on the number of addresses a single `query` call returns.
pub const DEFAULT_MAX_ADDRESSES: usize = 1000;

/// Returns the max age for the given protocol.
pub(crate) const fn max_age(protocol: crate::address::Protocol) -> Duration {
    use crate::address::Protocol;
    match protocol {
        Protocol::Ws => MAX_AGE_WS,
        Protocol::Rtc => MAX_AGE_RTC,
        Protocol::Dumb => MAX_AGE_DUMB,
    }
}

/// Returns the failed-attempt ceiling for the given protocol.
///
/// DUMB peers are outbound-only clients; the spec only defines failure
/// ceilings for WS and RTC so DUMB peers inherit the WS ceiling (they are
/// never dialled, but `failure` events may still arrive from a stale
/// caller and must not panic).
pub(crate) const fn max_failed_attempts(protocol: crate::address::Protocol) -> u32 {
    use crate::address::Protocol;
    match protocol {
        Protocol::Ws | Protocol::Dumb => MAX_FAILED_ATTEMPTS_WS,
        Protocol::Rtc => MAX_FAILED_ATTEMPTS_RTC,
    }
}
