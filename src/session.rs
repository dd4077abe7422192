//! Map session: the dataset, the current selection and the derived markers.
//!
//! A session owns an immutable [`PointStore`] and recomputes filtered points
//! and clusters from the current [`SelectionState`]. Cluster results can be
//! memoized per (category set, precision) since the dataset never changes.
//! The memo holds at most `Config::cluster_cache_capacity` results and drops
//! the least recently used one when full.

use crate::compute::cluster::{ClusterGroup, aggregate};
use crate::compute::filter::filter_by_category;
use crate::config::Config;
use crate::error::Result;
use crate::presentation::{MarkerDescriptor, Presenter, markers_to_feature_collection};
use crate::selection::SelectionState;
use crate::store::PointStore;
use geo::Point;
use geocluster_types::category::CategorySet;
use geocluster_types::point::PointRecord;
use geocluster_types::precision::Precision;
use geojson::FeatureCollection;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;

type CacheKey = (CategorySet, Precision);

/// Output handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Initial viewport center (x = lon, y = lat)
    pub center: Point,
    pub precision: Precision,
    /// Number of points passing the category filter
    pub visible_points: usize,
    pub markers: Vec<MarkerDescriptor>,
}

impl RenderFrame {
    pub fn to_feature_collection(&self) -> Result<FeatureCollection> {
        markers_to_feature_collection(&self.markers)
    }
}

/// Cluster cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cached_entries: usize,
}

#[derive(Debug)]
struct ClusterCache {
    entries: LruCache<CacheKey, Arc<[ClusterGroup]>>,
    hits: u64,
    misses: u64,
}

impl ClusterCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            hits: 0,
            misses: 0,
        }
    }
}

/// Interactive session over one dataset.
///
/// # Examples
///
/// ```rust
/// use geocluster::{MapSession, PointStore, SelectionState};
/// use geocluster_types::precision::Precision;
///
/// let store = PointStore::from_json_str(r#"[
///     {"id": "a", "type": 1, "lat": 10.0, "lon": 20.0, "gh_3": "xyz"},
///     {"id": "b", "type": 1, "lat": 12.0, "lon": 22.0, "gh_3": "xyz"},
///     {"id": "c", "type": 2, "lat": 50.0, "lon": 60.0, "gh_3": "abc"}
/// ]"#)?;
///
/// let mut session = MapSession::new(store);
/// assert_eq!(session.render().markers.len(), 3);
///
/// let grouped = session.selection().with_precision(Precision::level(3)?);
/// session.select(grouped);
/// assert_eq!(session.render().markers.len(), 2);
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
#[derive(Debug)]
pub struct MapSession {
    store: PointStore,
    config: Config,
    presenter: Presenter,
    selection: SelectionState,
    cache: Mutex<ClusterCache>,
}

impl MapSession {
    /// Session with default configuration and everything selected.
    pub fn new(store: PointStore) -> Self {
        Self::with_parts(store, Config::default(), SelectionState::default())
    }

    pub(crate) fn with_parts(store: PointStore, config: Config, selection: SelectionState) -> Self {
        Self {
            presenter: Presenter::new(&config),
            cache: Mutex::new(ClusterCache::new(config.cluster_cache_capacity)),
            store,
            config,
            selection,
        }
    }

    pub fn store(&self) -> &PointStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Replace the selection; returns the previous one.
    pub fn select(&mut self, selection: SelectionState) -> SelectionState {
        std::mem::replace(&mut self.selection, selection)
    }

    /// Points passing the current category filter, in dataset order.
    pub fn filtered(&self) -> Vec<&PointRecord> {
        filter_by_category(&self.store, self.selection.categories())
    }

    /// Clusters for the current selection; empty when precision is none.
    pub fn clusters(&self) -> Arc<[ClusterGroup]> {
        let precision = self.selection.precision();
        if precision.is_none() {
            return Arc::from(Vec::new());
        }

        if !self.config.memoize_clusters {
            return Arc::from(aggregate(self.filtered(), precision));
        }

        let key = (self.selection.categories().clone(), precision);
        let mut cache = self.cache.lock();
        if let Some(groups) = cache.entries.get(&key).cloned() {
            cache.hits += 1;
            log::debug!("cluster cache hit for precision {}", precision);
            return groups;
        }

        cache.misses += 1;
        log::debug!("cluster cache miss for precision {}", precision);
        let groups: Arc<[ClusterGroup]> = Arc::from(aggregate(self.filtered(), precision));
        // Misses only, so a returned pair is always an eviction
        if let Some(((categories, evicted), _)) = cache.entries.push(key, Arc::clone(&groups)) {
            log::debug!(
                "cluster cache full, evicted {} categories at precision {}",
                categories.len(),
                evicted
            );
        }
        groups
    }

    /// Center and markers for the current selection.
    pub fn render(&self) -> RenderFrame {
        let filtered = self.filtered();
        let center = self.presenter.center(filtered.iter().copied());
        let precision = self.selection.precision();

        let markers = if precision.is_none() {
            self.presenter.point_markers(filtered.iter().copied())
        } else {
            self.presenter.cluster_markers(&self.clusters())
        };

        RenderFrame {
            center,
            precision,
            visible_points: filtered.len(),
            markers,
        }
    }

    /// Drop all memoized cluster results.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock();
        cache.entries.clear();
        cache.hits = 0;
        cache.misses = 0;
    }

    pub fn stats(&self) -> SessionStats {
        let cache = self.cache.lock();
        SessionStats {
            cache_hits: cache.hits,
            cache_misses: cache.misses,
            cached_entries: cache.entries.len(),
        }
    }
}
