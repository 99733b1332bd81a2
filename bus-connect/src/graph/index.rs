//! Shared handle over the current route graph snapshot.
//!
//! Readers take an `Arc` to whatever snapshot is current and use it for
//! their whole call; a rebuild builds a fresh graph off the hot path and
//! swaps the pointer. A reader therefore never observes a partially built
//! index, only a possibly stale one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, TryLockError};

use tracing::{info, warn};

use super::snapshot::{BuildDiagnostic, RouteGraph};
use super::source::{RouteSource, SourceError};

/// Error from a failed graph rebuild.
///
/// The previous snapshot remains authoritative; only the caller that
/// triggered the rebuild sees this error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GraphBuildError {
    /// Loading the route corpus failed
    #[error("graph rebuild failed: {0}")]
    Source(#[from] SourceError),
}

/// Summary of one successful rebuild.
#[derive(Debug)]
pub struct RebuildReport {
    /// Generation number of the new snapshot.
    pub generation: u64,
    /// Number of routes admitted.
    pub route_count: usize,
    /// Routes excluded from the snapshot, with reasons.
    pub excluded: Vec<BuildDiagnostic>,
}

/// Shared, atomically swappable route graph.
///
/// The index starts stale with an empty generation-zero snapshot; the
/// first read (or an explicit [`rebuild`](Self::rebuild)) populates it.
pub struct RouteGraphIndex<S> {
    source: S,
    current: RwLock<Arc<RouteGraph>>,
    stale: AtomicBool,
    generation: AtomicU64,
    /// Serializes rebuilds so concurrent readers of a stale index do not
    /// duplicate the work; losers keep the previous snapshot.
    rebuild_slot: Mutex<()>,
}

impl<S: RouteSource> RouteGraphIndex<S> {
    /// Create an index over the given source, initially stale and empty.
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(RouteGraph::empty())),
            stale: AtomicBool::new(true),
            generation: AtomicU64::new(0),
            rebuild_slot: Mutex::new(()),
        }
    }

    /// Returns the current snapshot, rebuilding first if it is stale.
    ///
    /// When a rebuild is already in progress on another thread, the
    /// previous (stale-but-valid) snapshot is returned immediately rather
    /// than blocking. A rebuild failure is surfaced only to the caller
    /// whose read triggered it.
    pub fn snapshot(&self) -> Result<Arc<RouteGraph>, GraphBuildError> {
        if self.stale.load(Ordering::Acquire) {
            match self.rebuild_slot.try_lock() {
                Ok(_guard) => {
                    // Re-check under the lock: another rebuild may have
                    // finished between the flag read and the acquisition.
                    if self.stale.load(Ordering::Acquire) {
                        self.rebuild_locked()?;
                    }
                }
                Err(TryLockError::WouldBlock) => {}
                Err(TryLockError::Poisoned(_)) => {}
            }
        }

        Ok(self.read_current())
    }

    /// Marks the cached snapshot stale; the next read rebuilds it.
    pub fn invalidate(&self) {
        self.stale.store(true, Ordering::Release);
    }

    /// Returns the current snapshot without any staleness handling.
    ///
    /// Useful for observability and for callers that explicitly tolerate
    /// stale data; most callers want [`snapshot`](Self::snapshot).
    pub fn current(&self) -> Arc<RouteGraph> {
        self.read_current()
    }

    /// Forces a synchronous rebuild, waiting for any in-progress rebuild.
    pub fn rebuild(&self) -> Result<RebuildReport, GraphBuildError> {
        let _guard = self
            .rebuild_slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.rebuild_locked()
    }

    /// Current snapshot without any staleness handling.
    fn read_current(&self) -> Arc<RouteGraph> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Rebuild and swap. Caller must hold the rebuild slot.
    fn rebuild_locked(&self) -> Result<RebuildReport, GraphBuildError> {
        let records = match self.source.load_routes() {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "route graph rebuild failed, keeping previous snapshot");
                return Err(err.into());
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let (graph, excluded) = RouteGraph::build(records, generation);

        for diagnostic in &excluded {
            warn!(route = %diagnostic.route_id(), "route excluded from graph: {diagnostic}");
        }

        let report = RebuildReport {
            generation,
            route_count: graph.route_count(),
            excluded,
        };

        {
            let mut current = self
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = Arc::new(graph);
        }
        self.stale.store(false, Ordering::Release);

        info!(
            generation = report.generation,
            routes = report.route_count,
            excluded = report.excluded.len(),
            "route graph rebuilt"
        );

        Ok(report)
    }
}
