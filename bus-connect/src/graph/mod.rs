//! Route graph: the precomputed location-to-routes index.
//!
//! The graph layer ingests the raw route corpus from a [`RouteSource`],
//! validates it into domain types, and indexes every location by the
//! routes that can be boarded or alighted there. The index is rebuilt
//! wholesale and swapped atomically; it is never mutated in place.

mod index;
mod refresh;
mod snapshot;
mod source;

pub use index::{GraphBuildError, RebuildReport, RouteGraphIndex};
pub use refresh::spawn_periodic_rebuild;
pub use snapshot::{BuildDiagnostic, RouteEntry, RouteGraph};
pub use source::{InMemoryRouteSource, RouteRecord, RouteSource, SourceError, StopRecord};
