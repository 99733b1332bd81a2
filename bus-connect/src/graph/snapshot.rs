//! One immutable generation of the route graph.
//!
//! A snapshot maps every location to the routes that serve it, split by
//! role: routes a rider can board there (stop has a departure and is not
//! the terminal) and routes a rider can alight from there (stop has an
//! arrival and is not the origin). Building is a single pass over the
//! corpus, O(total stops across all routes).

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    BusRoute, DomainError, InvalidTimeFormat, LocationId, RouteId, RouteStop, TimeOfDay,
};

use super::source::{RouteRecord, StopRecord};

/// A route passing through a location, with the position of the stop that
/// serves it.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub route: Arc<BusRoute>,
    pub stop_pos: usize,
}

/// Reason a route was excluded from a snapshot.
///
/// A bad route never aborts the rebuild; it is dropped and reported so
/// data-quality tooling can flag the contribution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildDiagnostic {
    /// A stop time failed HH:MM parsing
    #[error("route {route_id} stop {seq}: invalid {field} time {value:?}: {source}")]
    InvalidTime {
        route_id: RouteId,
        seq: u32,
        field: &'static str,
        value: String,
        source: InvalidTimeFormat,
    },

    /// The route violated a domain invariant
    #[error("route {route_id}: {source}")]
    InvalidRoute {
        route_id: RouteId,
        source: DomainError,
    },
}

impl BuildDiagnostic {
    /// The route this diagnostic concerns.
    pub fn route_id(&self) -> RouteId {
        match self {
            BuildDiagnostic::InvalidTime { route_id, .. } => *route_id,
            BuildDiagnostic::InvalidRoute { route_id, .. } => *route_id,
        }
    }
}

/// One immutable generation of the location-to-routes index.
#[derive(Debug, Default)]
pub struct RouteGraph {
    generation: u64,
    routes: Vec<Arc<BusRoute>>,
    boardable: HashMap<LocationId, Vec<RouteEntry>>,
    alightable: HashMap<LocationId, Vec<RouteEntry>>,
}

impl RouteGraph {
    /// The empty generation-zero graph used before the first rebuild.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from raw records.
    ///
    /// Records that fail time parsing or domain validation are excluded
    /// individually and reported as diagnostics; the remaining corpus is
    /// still admitted.
    pub fn build(records: Vec<RouteRecord>, generation: u64) -> (Self, Vec<BuildDiagnostic>) {
        let mut routes = Vec::with_capacity(records.len());
        let mut diagnostics = Vec::new();

        for record in records {
            match validate_route(&record) {
                Ok(route) => routes.push(Arc::new(route)),
                Err(diagnostic) => diagnostics.push(diagnostic),
            }
        }

        let mut boardable: HashMap<LocationId, Vec<RouteEntry>> = HashMap::new();
        let mut alightable: HashMap<LocationId, Vec<RouteEntry>> = HashMap::new();

        for route in &routes {
            let last = route.stops().len() - 1;
            for (pos, stop) in route.stops().iter().enumerate() {
                if stop.departure().is_some() && pos < last {
                    boardable
                        .entry(stop.location())
                        .or_default()
                        .push(RouteEntry {
                            route: route.clone(),
                            stop_pos: pos,
                        });
                }
                if stop.arrival().is_some() && pos > 0 {
                    alightable
                        .entry(stop.location())
                        .or_default()
                        .push(RouteEntry {
                            route: route.clone(),
                            stop_pos: pos,
                        });
                }
            }
        }

        (
            Self {
                generation,
                routes,
                boardable,
                alightable,
            },
            diagnostics,
        )
    }

    /// Routes a rider can board at the location, in corpus order.
    pub fn routes_boardable_at(&self, location: LocationId) -> &[RouteEntry] {
        self.boardable
            .get(&location)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Routes a rider can alight from at the location, in corpus order.
    pub fn routes_alightable_at(&self, location: LocationId) -> &[RouteEntry] {
        self.alightable
            .get(&location)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The generation number of this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of routes admitted into this snapshot.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// All admitted routes, in corpus order.
    pub fn routes(&self) -> &[Arc<BusRoute>] {
        &self.routes
    }
}

/// Parse and validate one record into a domain route.
fn validate_route(record: &RouteRecord) -> Result<BusRoute, BuildDiagnostic> {
    let mut stops = Vec::with_capacity(record.stops.len());

    for stop in &record.stops {
        stops.push(validate_stop(record.route_id, stop)?);
    }

    BusRoute::new(record.route_id, record.name.clone(), stops).map_err(|source| {
        BuildDiagnostic::InvalidRoute {
            route_id: record.route_id,
            source,
        }
    })
}

fn validate_stop(route_id: RouteId, stop: &StopRecord) -> Result<RouteStop, BuildDiagnostic> {
    let arrival = parse_time(route_id, stop.seq, "arrival", stop.arrival.as_deref())?;
    let departure = parse_time(route_id, stop.seq, "departure", stop.departure.as_deref())?;

    RouteStop::new(stop.location_id, stop.seq, arrival, departure).map_err(|source| {
        BuildDiagnostic::InvalidRoute { route_id, source }
    })
}

fn parse_time(
    route_id: RouteId,
    seq: u32,
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<TimeOfDay>, BuildDiagnostic> {
    let Some(value) = value else {
        return Ok(None);
    };

    TimeOfDay::parse(value)
        .map(Some)
        .map_err(|source| BuildDiagnostic::InvalidTime {
            route_id,
            seq,
            field,
            value: value.to_string(),
            source,
        })
}
