//! Bus route and stop types.
//!
//! A `BusRoute` is one scheduled bus service: an ordered sequence of stops
//! with arrival/departure times. Invariants are enforced at construction,
//! so the graph and finder layers can index into the stop list freely.
//!
//! The timetable queries (`stop_at`, `can_board_at`, `can_alight_at`,
//! `is_ordered`) answer "does this bus visit location X, and can a rider
//! get on or off there?"

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DomainError, LocationId, TimeOfDay};

/// Opaque identifier of a bus route.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RouteId(pub u64);

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One scheduled stop on a bus route.
///
/// At least one of arrival/departure is always present: the origin stop
/// has no arrival, the terminal stop has no departure, and intermediate
/// stops normally have both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStop {
    location: LocationId,
    seq: u32,
    arrival: Option<TimeOfDay>,
    departure: Option<TimeOfDay>,
}

impl RouteStop {
    /// Construct a stop, validating its time invariants.
    ///
    /// # Errors
    ///
    /// Returns `Err` if both times are absent, or if both are present and
    /// the arrival is later than the departure.
    pub fn new(
        location: LocationId,
        seq: u32,
        arrival: Option<TimeOfDay>,
        departure: Option<TimeOfDay>,
    ) -> Result<Self, DomainError> {
        match (arrival, departure) {
            (None, None) => return Err(DomainError::MissingStopTime { seq }),
            (Some(arr), Some(dep)) if arr > dep => {
                return Err(DomainError::StopTimesOutOfOrder {
                    seq,
                    arrival: arr,
                    departure: dep,
                });
            }
            _ => {}
        }

        Ok(Self {
            location,
            seq,
            arrival,
            departure,
        })
    }

    /// Returns the location this stop serves.
    pub fn location(&self) -> LocationId {
        self.location
    }

    /// Returns the 0-based sequence index along the route.
    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// Returns the arrival time, absent at the origin stop.
    pub fn arrival(&self) -> Option<TimeOfDay> {
        self.arrival
    }

    /// Returns the departure time, absent at the terminal stop.
    pub fn departure(&self) -> Option<TimeOfDay> {
        self.departure
    }
}

/// One scheduled bus service with its ordered stop sequence.
///
/// Immutable within a planning cycle; the graph rebuilds these wholesale
/// when schedule data changes.
///
/// # Invariants
///
/// - At least one stop
/// - Sequence indices strictly increasing (hence unique)
/// - Per-stop time invariants (see [`RouteStop::new`])
#[derive(Debug, Clone, PartialEq)]
pub struct BusRoute {
    id: RouteId,
    name: String,
    stops: Vec<RouteStop>,
}

impl BusRoute {
    /// Construct a route, validating the stop sequence.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the stop list is empty or sequence indices are not
    /// strictly increasing.
    pub fn new(
        id: RouteId,
        name: impl Into<String>,
        stops: Vec<RouteStop>,
    ) -> Result<Self, DomainError> {
        if stops.is_empty() {
            return Err(DomainError::EmptyRoute);
        }

        for pair in stops.windows(2) {
            if pair[1].seq <= pair[0].seq {
                return Err(DomainError::NonMonotonicSequence {
                    prev: pair[0].seq,
                    next: pair[1].seq,
                });
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            stops,
        })
    }

    /// Returns the route identifier.
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Returns the carrier name/number.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered stop sequence.
    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    /// Find the first stop serving a location.
    ///
    /// Returns the stop's position in the sequence along with the stop.
    /// A route is assumed not to revisit a location within one direction;
    /// if the data does revisit, the earliest position wins.
    pub fn stop_at(&self, location: LocationId) -> Option<(usize, &RouteStop)> {
        self.stops
            .iter()
            .enumerate()
            .find(|(_, stop)| stop.location == location)
    }

    /// True iff a rider can board this route at the location: the matched
    /// stop has a departure time and is not the terminal stop.
    pub fn can_board_at(&self, location: LocationId) -> bool {
        match self.stop_at(location) {
            Some((pos, stop)) => stop.departure.is_some() && pos < self.stops.len() - 1,
            None => false,
        }
    }

    /// True iff a rider can alight from this route at the location: the
    /// matched stop has an arrival time and is not the origin stop.
    pub fn can_alight_at(&self, location: LocationId) -> bool {
        match self.stop_at(location) {
            Some((pos, stop)) => stop.arrival.is_some() && pos > 0,
            None => false,
        }
    }

    /// True iff the board stop comes strictly before the alight stop in
    /// the route's direction of travel. Riding backward is impossible.
    pub fn is_ordered(&self, board: LocationId, alight: LocationId) -> bool {
        match (self.stop_at(board), self.stop_at(alight)) {
            (Some((board_pos, _)), Some((alight_pos, _))) => board_pos < alight_pos,
            _ => false,
        }
    }
}
