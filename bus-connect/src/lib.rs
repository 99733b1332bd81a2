//! Connecting-routes engine for a crowd-sourced bus-schedule platform.
//!
//! Answers: "there is no direct bus from A to B — which pairs of buses,
//! meeting at a shared intermediate stop, get me there, and how long does
//! the whole trip take?"

pub mod cache;
pub mod domain;
pub mod finder;
pub mod graph;
