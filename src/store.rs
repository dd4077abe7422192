//! Immutable point store
//!
//! Holds the loaded dataset in its original order for the lifetime of a
//! session and indexes it by identifier.

pub mod loader;

pub use loader::{DatasetFile, DatasetLoader, PointSource};

use crate::error::{GeoclusterError, Result};
use geocluster_types::category::{Category, CategorySet};
use geocluster_types::point::PointRecord;
use rustc_hash::FxHashMap;
use std::path::Path;

/// Ordered, read-only collection of point records.
///
/// # Examples
///
/// ```rust
/// use geocluster::PointStore;
///
/// let store = PointStore::from_json_str(r#"[
///     {"id": "a", "type": 1, "lat": 10.0, "lon": 20.0, "gh_3": "xyz"},
///     {"id": "b", "type": 2, "lat": 12.0, "lon": 22.0}
/// ]"#)?;
///
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.get("b").map(|p| p.lat()), Some(12.0));
/// # Ok::<(), geocluster::GeoclusterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    points: Vec<PointRecord>,
    by_id: FxHashMap<String, usize>,
}

impl PointStore {
    /// Build a store, rejecting duplicate identifiers.
    pub fn from_records(points: Vec<PointRecord>) -> Result<Self> {
        let mut by_id = FxHashMap::default();
        by_id.reserve(points.len());

        for (i, point) in points.iter().enumerate() {
            if by_id.insert(point.id.clone(), i).is_some() {
                return Err(GeoclusterError::DuplicateId(point.id.clone()));
            }
        }

        Ok(Self { points, by_id })
    }

    /// Build a store from any [`PointSource`].
    pub fn load<S: PointSource + ?Sized>(source: &S) -> Result<Self> {
        Self::from_records(source.read_points()?)
    }

    /// Parse a JSON record array or GeoJSON FeatureCollection.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_records(DatasetLoader::new().parse_str(text)?)
    }

    /// Parse a GeoJSON FeatureCollection.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        Self::from_records(DatasetLoader::new().parse_geojson(text)?)
    }

    /// Read a dataset file in either supported format.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_records(DatasetLoader::new().load_path(path)?)
    }

    /// All points in load order.
    pub fn points(&self) -> &[PointRecord] {
        &self.points
    }

    pub fn get(&self, id: &str) -> Option<&PointRecord> {
        self.by_id.get(id).map(|&i| &self.points[i])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct categories present in the dataset.
    pub fn categories(&self) -> CategorySet {
        self.points.iter().map(|p| p.category).collect()
    }

    /// Number of points per category, ascending by category.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let mut counts: FxHashMap<Category, usize> = FxHashMap::default();
        for point in &self.points {
            *counts.entry(point.category).or_insert(0) += 1;
        }
        let mut counts: Vec<(Category, usize)> = counts.into_iter().collect();
        counts.sort_unstable_by_key(|(category, _)| *category);
        counts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointRecord> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a PointStore {
    type Item = &'a PointRecord;
    type IntoIter = std::slice::Iter<'a, PointRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
