//! Connection finder: the two-leg join over the route graph.
//!
//! This module implements the core algorithm that answers: "no bus runs
//! directly from A to B — which pairs of buses, meeting at a shared
//! intermediate stop, make the trip?" Candidates are joined through the
//! graph's boardable/alightable indexes, timed with the overnight-wrap
//! arithmetic, deduplicated, ranked, and truncated.

mod config;
mod rank;
mod search;

pub use config::FinderConfig;
pub use rank::{dedupe_candidates, rank_candidates};
pub use search::{
    ConnectingRoute, ConnectionCandidate, ConnectionFinder, ConnectionStop,
    InMemoryLocationRegistry, LegSummary, LocationRegistry, SearchError,
};
