//! Two-leg connection search.
//!
//! For a (from, to) pair with no direct service, the search pairs every
//! route boardable at `from` with every route alightable at `to` and looks
//! for shared intermediate stops in riding order. The whole call works off
//! one graph snapshot, so a concurrent rebuild can never mix generations
//! within a result. Output is a pure function of (snapshot, from, to,
//! config), which makes it safe to cache by `(from, to)`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    BusRoute, Location, LocationId, RouteId, TimeOfDay, duration_minutes, format_duration,
    wait_minutes,
};
use crate::graph::{GraphBuildError, RouteEntry, RouteGraphIndex, RouteSource};

use super::config::FinderConfig;
use super::rank::{dedupe_candidates, rank_candidates};

/// Error from connection search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Malformed search request
    #[error("invalid route request: {0}")]
    InvalidRequest(&'static str),

    /// An endpoint is unknown to the location registry
    #[error("location not found: {0}")]
    LocationNotFound(LocationId),

    /// The graph rebuild triggered by this call failed
    #[error(transparent)]
    Graph(#[from] GraphBuildError),
}

/// Trait for looking up locations by id.
///
/// Implemented by the external location registry; an in-memory
/// implementation ships for tests and embedded use.
pub trait LocationRegistry {
    /// Look up a location by id.
    fn lookup(&self, id: LocationId) -> Option<Location>;
}

/// In-memory location registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLocationRegistry {
    locations: HashMap<LocationId, Location>,
}

impl InMemoryLocationRegistry {
    /// Create a registry serving the given locations.
    pub fn new(locations: impl IntoIterator<Item = Location>) -> Self {
        Self {
            locations: locations.into_iter().map(|loc| (loc.id, loc)).collect(),
        }
    }
}

impl LocationRegistry for InMemoryLocationRegistry {
    fn lookup(&self, id: LocationId) -> Option<Location> {
        self.locations.get(&id).cloned()
    }
}

/// A valid (first leg, connection point, second leg) triple with its
/// computed timings. Transient: built per query, never persisted.
#[derive(Debug, Clone)]
pub struct ConnectionCandidate {
    pub first: Arc<BusRoute>,
    pub first_board: usize,
    pub first_alight: usize,
    pub second: Arc<BusRoute>,
    pub second_board: usize,
    pub second_alight: usize,
    pub connection: LocationId,
    /// First leg departure at the origin.
    pub departure: TimeOfDay,
    /// First leg arrival at the connection point.
    pub connection_arrival: TimeOfDay,
    /// Second leg departure from the connection point.
    pub connection_departure: TimeOfDay,
    /// Second leg arrival at the destination.
    pub arrival: TimeOfDay,
    pub wait_minutes: u32,
    pub total_duration_minutes: u32,
}

/// Display summary of one leg of a connecting itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegSummary {
    pub route_id: RouteId,
    pub route_name: String,
    pub board_location: LocationId,
    pub departure: TimeOfDay,
    pub alight_location: LocationId,
    pub arrival: TimeOfDay,
}

/// Timing of one leg's stop at the connection point, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStop {
    pub route_id: RouteId,
    pub route_name: String,
    pub arrival: Option<TimeOfDay>,
    pub departure: Option<TimeOfDay>,
}

/// One connecting itinerary: two legs meeting at a shared stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectingRoute {
    pub connection_location: LocationId,
    pub wait_minutes: u32,
    pub total_duration_minutes: u32,
    pub first_leg: LegSummary,
    pub second_leg: LegSummary,
    /// The stops at the connection point, one per leg.
    pub connection_stops: Vec<ConnectionStop>,
}

impl ConnectingRoute {
    fn from_candidate(candidate: ConnectionCandidate) -> Self {
        let first_stops = candidate.first.stops();
        let second_stops = candidate.second.stops();

        let first_leg = LegSummary {
            route_id: candidate.first.id(),
            route_name: candidate.first.name().to_string(),
            board_location: first_stops[candidate.first_board].location(),
            departure: candidate.departure,
            alight_location: candidate.connection,
            arrival: candidate.connection_arrival,
        };
        let second_leg = LegSummary {
            route_id: candidate.second.id(),
            route_name: candidate.second.name().to_string(),
            board_location: candidate.connection,
            departure: candidate.connection_departure,
            alight_location: second_stops[candidate.second_alight].location(),
            arrival: candidate.arrival,
        };

        let connection_stops = vec![
            ConnectionStop {
                route_id: candidate.first.id(),
                route_name: candidate.first.name().to_string(),
                arrival: first_stops[candidate.first_alight].arrival(),
                departure: first_stops[candidate.first_alight].departure(),
            },
            ConnectionStop {
                route_id: candidate.second.id(),
                route_name: candidate.second.name().to_string(),
                arrival: second_stops[candidate.second_board].arrival(),
                departure: second_stops[candidate.second_board].departure(),
            },
        ];

        Self {
            connection_location: candidate.connection,
            wait_minutes: candidate.wait_minutes,
            total_duration_minutes: candidate.total_duration_minutes,
            first_leg,
            second_leg,
            connection_stops,
        }
    }

    /// The wait rendered as "Xh Ym".
    pub fn formatted_wait(&self) -> String {
        format_duration(self.wait_minutes)
    }

    /// The total trip time rendered as "Xh Ym".
    pub fn formatted_duration(&self) -> String {
        format_duration(self.total_duration_minutes)
    }
}

/// Connection finder over a shared route graph.
pub struct ConnectionFinder<'a, S, L> {
    index: &'a RouteGraphIndex<S>,
    locations: &'a L,
    config: &'a FinderConfig,
}

impl<'a, S: RouteSource, L: LocationRegistry> ConnectionFinder<'a, S, L> {
    /// Create a new finder.
    pub fn new(index: &'a RouteGraphIndex<S>, locations: &'a L, config: &'a FinderConfig) -> Self {
        Self {
            index,
            locations,
            config,
        }
    }

    /// Find one-transfer itineraries from `from` to `to`.
    ///
    /// Results are ordered by total trip time ascending, then wait, then
    /// route ids, and truncated to the configured maximum. An empty list
    /// is a normal outcome, not a failure.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `from == to`
    /// - either endpoint is unknown to the location registry
    /// - this call triggered a graph rebuild and the rebuild failed
    pub fn find_connections(
        &self,
        from: LocationId,
        to: LocationId,
    ) -> Result<Vec<ConnectingRoute>, SearchError> {
        if from == to {
            return Err(SearchError::InvalidRequest(
                "origin and destination are the same location",
            ));
        }
        self.locations
            .lookup(from)
            .ok_or(SearchError::LocationNotFound(from))?;
        self.locations
            .lookup(to)
            .ok_or(SearchError::LocationNotFound(to))?;

        // One snapshot for the whole call: a concurrent rebuild only
        // affects later calls.
        let snapshot = self.index.snapshot()?;

        let first_candidates = snapshot.routes_boardable_at(from);
        let second_candidates = snapshot.routes_alightable_at(to);

        let mut candidates = Vec::new();
        for first in first_candidates {
            for second in second_candidates {
                // No self-transfer: a route reaching both endpoints is a
                // direct route, owned by a separate collaborator
                if first.route.id() == second.route.id() {
                    continue;
                }
                self.join_pair(first, second, from, to, &mut candidates);
            }
        }

        debug!(
            %from,
            %to,
            first_legs = first_candidates.len(),
            second_legs = second_candidates.len(),
            raw_candidates = candidates.len(),
            "paired candidate legs"
        );

        let candidates = dedupe_candidates(candidates);
        let mut candidates = rank_candidates(candidates);
        candidates.truncate(self.config.max_results);

        Ok(candidates
            .into_iter()
            .map(ConnectingRoute::from_candidate)
            .collect())
    }

    /// Emit every valid connection of one (first leg, second leg) pair.
    fn join_pair(
        &self,
        first: &RouteEntry,
        second: &RouteEntry,
        from: LocationId,
        to: LocationId,
        out: &mut Vec<ConnectionCandidate>,
    ) {
        let a = &first.route;
        let b = &second.route;

        let Some(departure) = a.stops()[first.stop_pos].departure() else {
            return;
        };
        let Some(arrival) = b.stops()[second.stop_pos].arrival() else {
            return;
        };

        // Every stop of A after boarding is a potential connection point
        for (pos, stop) in a.stops().iter().enumerate().skip(first.stop_pos + 1) {
            let connection = stop.location();
            if connection == from || connection == to {
                continue;
            }
            let Some(connection_arrival) = stop.arrival() else {
                continue;
            };

            // B must serve the connection point, with a departure, before
            // its own alighting stop
            let Some((b_pos, b_stop)) = b.stop_at(connection) else {
                continue;
            };
            if b_pos >= second.stop_pos {
                continue;
            }
            let Some(connection_departure) = b_stop.departure() else {
                continue;
            };

            let wait = wait_minutes(connection_arrival, connection_departure);
            if wait < self.config.min_wait_mins || wait > self.config.max_wait_mins {
                continue;
            }

            // End-to-end in a single wrap computation; summing legs and
            // wait would double-wrap at midnight
            let total = duration_minutes(departure, arrival);

            out.push(ConnectionCandidate {
                first: a.clone(),
                first_board: first.stop_pos,
                first_alight: pos,
                second: b.clone(),
                second_board: b_pos,
                second_alight: second.stop_pos,
                connection,
                departure,
                connection_arrival,
                connection_departure,
                arrival,
                wait_minutes: wait,
                total_duration_minutes: total,
            });
        }
    }
}
