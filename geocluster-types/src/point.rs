use crate::category::Category;
use crate::precision::GeohashPrecision;
use geo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single dataset entry.
///
/// Positions follow the `geo` convention: `x` is longitude, `y` is latitude.
/// Geohash prefixes are precomputed upstream and stored per precision level;
/// a record may carry any subset of the levels, including none.
///
/// # Examples
///
/// ```
/// use geocluster_types::category::Category;
/// use geocluster_types::point::PointRecord;
/// use geocluster_types::precision::GeohashPrecision;
///
/// let gh3 = GeohashPrecision::new(3).unwrap();
/// let gh5 = GeohashPrecision::new(5).unwrap();
///
/// let record = PointRecord::new("station-7", Category(4), 48.85, 2.35)
///     .with_geohash(gh3, "u09");
///
/// assert_eq!(record.lat(), 48.85);
/// assert_eq!(record.lon(), 2.35);
/// assert_eq!(record.geohash(gh3), Some("u09"));
/// assert_eq!(record.geohash(gh5), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Identifier, unique within a store
    pub id: String,
    /// Categorical type tag
    pub category: Category,
    /// Position (x = longitude, y = latitude)
    pub position: Point<f64>,
    /// Precomputed geohash prefixes keyed by precision level
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub geohashes: BTreeMap<GeohashPrecision, String>,
}

impl PointRecord {
    /// Create a record without any geohash prefixes.
    ///
    /// Note the argument order is latitude then longitude, matching how the
    /// dataset columns are named.
    pub fn new(id: impl Into<String>, category: Category, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            category,
            position: Point::new(lon, lat),
            geohashes: BTreeMap::new(),
        }
    }

    /// Attach a precomputed prefix for one precision level.
    pub fn with_geohash(mut self, level: GeohashPrecision, prefix: impl Into<String>) -> Self {
        self.geohashes.insert(level, prefix.into());
        self
    }

    pub fn lat(&self) -> f64 {
        self.position.y()
    }

    pub fn lon(&self) -> f64 {
        self.position.x()
    }

    /// The prefix at `level`, if the dataset supplied one.
    pub fn geohash(&self, level: GeohashPrecision) -> Option<&str> {
        self.geohashes.get(&level).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_follow_geo_convention() {
        let record = PointRecord::new("a", Category(1), 10.0, 20.0);
        assert_eq!(record.position.x(), 20.0);
        assert_eq!(record.position.y(), 10.0);
    }

    #[test]
    fn test_geohash_lookup_per_level() {
        let gh2 = GeohashPrecision::new(2).unwrap();
        let gh3 = GeohashPrecision::new(3).unwrap();
        let record = PointRecord::new("a", Category(1), 0.0, 0.0)
            .with_geohash(gh2, "s0")
            .with_geohash(gh3, "s00");
        assert_eq!(record.geohash(gh2), Some("s0"));
        assert_eq!(record.geohash(gh3), Some("s00"));
        assert_eq!(record.geohashes.len(), 2);
    }

    #[test]
    fn test_serde_skips_empty_geohashes() {
        let record = PointRecord::new("a", Category(1), 1.0, 2.0);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("geohashes").is_none());
        let back: PointRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
