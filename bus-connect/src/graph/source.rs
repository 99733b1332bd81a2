//! Route data source abstraction.
//!
//! The ingestion/persistence layer supplies the active route corpus as raw
//! records with textual times. Validation happens during graph build, not
//! here, so one malformed row can be excluded without failing ingestion
//! wholesale.

use serde::{Deserialize, Serialize};

use crate::domain::{LocationId, RouteId};

/// Raw stop row as yielded by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRecord {
    pub location_id: LocationId,
    pub seq: u32,
    /// Arrival time as "HH:MM", absent at the origin stop.
    pub arrival: Option<String>,
    /// Departure time as "HH:MM", absent at the terminal stop.
    pub departure: Option<String>,
}

/// Raw route row as yielded by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route_id: RouteId,
    pub name: String,
    pub stops: Vec<StopRecord>,
}

/// Error from the underlying route data source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The data source could not be reached or failed mid-load
    #[error("route data source unavailable: {0}")]
    Unavailable(String),
}

/// Trait for loading the full active route corpus.
///
/// This abstraction allows the graph to be rebuilt from any backing store
/// and tested with in-memory data.
pub trait RouteSource: Send + Sync {
    /// Load every active route record.
    fn load_routes(&self) -> Result<Vec<RouteRecord>, SourceError>;
}

/// In-memory route source for tests and embedded use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRouteSource {
    routes: Vec<RouteRecord>,
}

impl InMemoryRouteSource {
    /// Create a source serving the given records.
    pub fn new(routes: Vec<RouteRecord>) -> Self {
        Self { routes }
    }
}

impl RouteSource for InMemoryRouteSource {
    fn load_routes(&self) -> Result<Vec<RouteRecord>, SourceError> {
        Ok(self.routes.clone())
    }
}
