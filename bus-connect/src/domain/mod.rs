//! Domain types for the connecting-routes engine.
//!
//! This module contains the core domain model types that represent
//! validated schedule data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod error;
mod location;
mod route;
mod time;

pub use error::DomainError;
pub use location::{Location, LocationId};
pub use route::{BusRoute, RouteId, RouteStop};
pub use time::{InvalidTimeFormat, TimeOfDay, duration_minutes, format_duration, wait_minutes};
