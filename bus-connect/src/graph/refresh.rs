//! Scheduled graph rebuilds.
//!
//! Ingestion normally calls [`RouteGraphIndex::invalidate`] after data
//! changes, but deployments without an ingestion hook rebuild on a fixed
//! interval instead.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::index::RouteGraphIndex;
use super::source::RouteSource;

/// Spawn a background task that rebuilds the graph every `period`.
///
/// The first tick fires after one full period; the rebuild itself runs on
/// the blocking pool, off the async workers. Failures are logged and the
/// previous snapshot stays in service until the next tick.
///
/// The returned handle can be aborted to stop the refresh loop.
pub fn spawn_periodic_rebuild<S>(
    index: Arc<RouteGraphIndex<S>>,
    period: Duration,
) -> tokio::task::JoinHandle<()>
where
    S: RouteSource + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;

            let index = index.clone();
            let outcome = tokio::task::spawn_blocking(move || index.rebuild()).await;

            match outcome {
                Ok(Ok(report)) => info!(
                    generation = report.generation,
                    routes = report.route_count,
                    excluded = report.excluded.len(),
                    "scheduled route graph rebuild complete"
                ),
                Ok(Err(err)) => {
                    warn!(error = %err, "scheduled route graph rebuild failed")
                }
                Err(join_err) => {
                    warn!(error = %join_err, "scheduled route graph rebuild panicked")
                }
            }
        }
    })
}
