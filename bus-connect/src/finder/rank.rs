//! Candidate deduplication and ranking.
//!
//! Orders connection candidates so the most useful itineraries come first,
//! and collapses duplicates produced by duplicate route definitions or by
//! a route revisiting a location.

use std::collections::HashSet;

use super::search::ConnectionCandidate;

/// Deduplicate candidates sharing the same business key: (first route id,
/// second route id, connection location).
///
/// Keeps the first encountered, so the result is stable under input
/// ordering. Distinct connection points of the same route pair are NOT
/// collapsed; their waits and durations differ.
pub fn dedupe_candidates(candidates: Vec<ConnectionCandidate>) -> Vec<ConnectionCandidate> {
    let mut seen = HashSet::new();

    candidates
        .into_iter()
        .filter(|c| seen.insert((c.first.id(), c.second.id(), c.connection)))
        .collect()
}

/// Rank candidates by preference.
///
/// Candidates are ordered by:
/// 1. Total trip time (shorter is better)
/// 2. Wait at the connection point (shorter is better)
/// 3. First route id, then second route id (deterministic output)
///
/// Returns candidates sorted best-first.
pub fn rank_candidates(mut candidates: Vec<ConnectionCandidate>) -> Vec<ConnectionCandidate> {
    candidates.sort_by(|a, b| {
        let duration_cmp = a.total_duration_minutes.cmp(&b.total_duration_minutes);
        if duration_cmp != std::cmp::Ordering::Equal {
            return duration_cmp;
        }

        let wait_cmp = a.wait_minutes.cmp(&b.wait_minutes);
        if wait_cmp != std::cmp::Ordering::Equal {
            return wait_cmp;
        }

        let first_cmp = a.first.id().cmp(&b.first.id());
        if first_cmp != std::cmp::Ordering::Equal {
            return first_cmp;
        }

        a.second.id().cmp(&b.second.id())
    });

    candidates
}
