//! Caching layer for connection search results.
//!
//! The finder's output is a pure function of (snapshot, from, to, config),
//! so results can be cached by `(from, to)` with a TTL in the tens of
//! minutes. The cache must be dropped together with the snapshot when
//! schedule data changes; [`CachedConnectionFinder::invalidate`] does both
//! in one call so ingestion hooks have a single entry point.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache as MokaCache;

use crate::domain::LocationId;
use crate::finder::{ConnectingRoute, ConnectionFinder, FinderConfig, LocationRegistry, SearchError};
use crate::graph::{RouteGraphIndex, RouteSource};

/// Cache key for connection queries: (from, to).
type QueryKey = (LocationId, LocationId);

/// Cached query result.
type QueryEntry = Arc<Vec<ConnectingRoute>>;

/// Configuration for the query cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Cache for connection search results.
pub struct ConnectionCache {
    results: MokaCache<QueryKey, QueryEntry>,
}

impl ConnectionCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let results = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { results }
    }

    /// Get a cached result.
    pub fn get(&self, key: &QueryKey) -> Option<QueryEntry> {
        self.results.get(key)
    }

    /// Insert a result into the cache.
    pub fn insert(&self, key: QueryKey, entry: QueryEntry) {
        self.results.insert(key, entry);
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.results.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.results.invalidate_all();
    }
}

/// Connection finder with result caching.
///
/// Owns the graph index handle, the location registry, and the finder
/// configuration, so it can be shared as one service object.
pub struct CachedConnectionFinder<S, L> {
    index: Arc<RouteGraphIndex<S>>,
    locations: L,
    config: FinderConfig,
    cache: ConnectionCache,
}

impl<S: RouteSource, L: LocationRegistry> CachedConnectionFinder<S, L> {
    /// Create a new cached finder.
    pub fn new(
        index: Arc<RouteGraphIndex<S>>,
        locations: L,
        config: FinderConfig,
        cache_config: &CacheConfig,
    ) -> Self {
        Self {
            index,
            locations,
            config,
            cache: ConnectionCache::new(cache_config),
        }
    }

    /// Find connections, using the cache if possible.
    ///
    /// Errors are never cached.
    pub fn find_connections(
        &self,
        from: LocationId,
        to: LocationId,
    ) -> Result<QueryEntry, SearchError> {
        let key = (from, to);

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let finder = ConnectionFinder::new(&self.index, &self.locations, &self.config);
        let results = finder.find_connections(from, to)?;

        let entry = Arc::new(results);
        self.cache.insert(key, entry.clone());

        Ok(entry)
    }

    /// Invalidate both the graph snapshot and the query cache.
    ///
    /// Called by the ingestion pipeline after schedule data changes.
    pub fn invalidate(&self) {
        self.index.invalidate();
        self.cache.invalidate_all();
    }

    /// The underlying graph index handle.
    pub fn index(&self) -> &Arc<RouteGraphIndex<S>> {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use crate::finder::InMemoryLocationRegistry;
    use crate::graph::{InMemoryRouteSource, RouteRecord, StopRecord};

    const CHENNAI: LocationId = LocationId(1);
    const TRICHY: LocationId = LocationId(2);
    const MADURAI: LocationId = LocationId(3);
    const SALEM: LocationId = LocationId(4);

    fn stop_record(
        loc: u64,
        seq: u32,
        arrival: Option<&str>,
        departure: Option<&str>,
    ) -> StopRecord {
        StopRecord {
            location_id: LocationId(loc),
            seq,
            arrival: arrival.map(String::from),
            departure: departure.map(String::from),
        }
    }

    fn fixture_finder() -> CachedConnectionFinder<InMemoryRouteSource, InMemoryLocationRegistry> {
        let source = InMemoryRouteSource::new(vec![
            RouteRecord {
                route_id: crate::domain::RouteId(1),
                name: "TNSTC 460".to_string(),
                stops: vec![
                    stop_record(1, 0, None, Some("06:00")),
                    stop_record(2, 1, Some("11:00"), Some("11:10")),
                    stop_record(3, 2, Some("13:30"), None),
                ],
            },
            RouteRecord {
                route_id: crate::domain::RouteId(2),
                name: "TNSTC 137".to_string(),
                stops: vec![
                    stop_record(2, 0, None, Some("11:45")),
                    stop_record(4, 1, Some("14:15"), None),
                ],
            },
        ]);

        let registry = InMemoryLocationRegistry::new(vec![
            Location::new(CHENNAI, "Chennai", 13.0827, 80.2707),
            Location::new(TRICHY, "Trichy", 10.7905, 78.7047),
            Location::new(MADURAI, "Madurai", 9.9252, 78.1198),
            Location::new(SALEM, "Salem", 11.6643, 78.1460),
        ]);

        CachedConnectionFinder::new(
            Arc::new(RouteGraphIndex::new(source)),
            registry,
            FinderConfig::default(),
            &CacheConfig::default(),
        )
    }

    #[test]
    fn repeated_query_hits_the_cache() {
        let finder = fixture_finder();

        let first = finder.find_connections(CHENNAI, SALEM).unwrap();
        let second = finder.find_connections(CHENNAI, SALEM).unwrap();

        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn distinct_queries_are_cached_separately() {
        let finder = fixture_finder();

        let to_salem = finder.find_connections(CHENNAI, SALEM).unwrap();
        let to_madurai = finder.find_connections(CHENNAI, MADURAI).unwrap();

        assert_eq!(to_salem.len(), 1);
        assert!(to_madurai.is_empty());
        assert!(!Arc::ptr_eq(&to_salem, &to_madurai));
    }

    #[test]
    fn invalidate_drops_cached_results() {
        let finder = fixture_finder();

        let before = finder.find_connections(CHENNAI, SALEM).unwrap();
        finder.invalidate();
        let after = finder.find_connections(CHENNAI, SALEM).unwrap();

        // Recomputed, not served from cache
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);

        // The graph was rebuilt too
        assert!(finder.index().current().generation() >= 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let finder = fixture_finder();

        let unknown = LocationId(999);
        assert!(finder.find_connections(CHENNAI, unknown).is_err());
        assert!(finder.find_connections(CHENNAI, unknown).is_err());
        assert_eq!(finder.cache.entry_count(), 0);
    }
}
