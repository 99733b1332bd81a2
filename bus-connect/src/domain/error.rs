//! Domain error types.
//!
//! These errors represent invariant violations in schedule data. They are
//! distinct from data-source and search errors.

use super::TimeOfDay;

/// Domain-level errors for route and stop validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Stop carries neither an arrival nor a departure time
    #[error("stop at sequence {seq} has neither arrival nor departure time")]
    MissingStopTime { seq: u32 },

    /// Stop times contradict each other
    #[error("stop at sequence {seq} arrives at {arrival} after departing at {departure}")]
    StopTimesOutOfOrder {
        seq: u32,
        arrival: TimeOfDay,
        departure: TimeOfDay,
    },

    /// Route has no stops at all
    #[error("route must have at least one stop")]
    EmptyRoute,

    /// Stop sequence indices are not strictly increasing
    #[error("stop sequence must be strictly increasing: {prev} followed by {next}")]
    NonMonotonicSequence { prev: u32, next: u32 },
}
