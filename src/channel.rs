//! Abstract collaborators the book consumes but does not own.
//!
//! `Channel` and `PlatformUtils` are the seams described in `spec.md`
//! §6: the book never closes a channel and never queries the platform
//! for anything beyond online/offline status.

/// An opaque handle to a signal channel or a connection.
///
/// Equality identifies a specific channel instance; `closed_by_remote`
/// is an observation the transport layer attaches once the channel has
/// gone away, not something the book can compute on its own.
pub trait Channel: Clone + PartialEq + Eq {
    fn closed_by_remote(&self) -> bool;
}

/// Host platform queries the book needs for the `disconnected` transition.
pub trait PlatformUtils {
    fn is_online(&self) -> bool;
}
