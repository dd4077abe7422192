//! Geohash-prefix clustering.
//!
//! Points are grouped by the composite key (prefix at the selected precision,
//! category). Keys are compared structurally, so prefixes containing any
//! character cannot collide with one another.

use geo::Point;
use geocluster_types::category::Category;
use geocluster_types::point::PointRecord;
use geocluster_types::precision::{GeohashPrecision, Precision};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Grouping key of a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClusterKey {
    pub prefix: String,
    pub category: Category,
}

/// A non-empty group of points sharing the same [`ClusterKey`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterGroup {
    key: ClusterKey,
    precision: GeohashPrecision,
    members: Vec<PointRecord>,
    centroid: Point,
}

impl ClusterGroup {
    pub fn key(&self) -> &ClusterKey {
        &self.key
    }

    pub fn prefix(&self) -> &str {
        &self.key.prefix
    }

    pub fn category(&self) -> Category {
        self.key.category
    }

    /// Precision level the group was computed at.
    pub fn precision(&self) -> GeohashPrecision {
        self.precision
    }

    /// Members in input order.
    pub fn members(&self) -> &[PointRecord] {
        &self.members
    }

    /// Number of members; always at least one.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Mean position of the members (x = lon, y = lat).
    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn centroid_lat(&self) -> f64 {
        self.centroid.y()
    }

    pub fn centroid_lon(&self) -> f64 {
        self.centroid.x()
    }

    /// Whether a point with identifier `id` belongs to this group.
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.id == id)
    }
}

/// Total number of points across `groups`.
pub fn total_members(groups: &[ClusterGroup]) -> usize {
    groups.iter().map(ClusterGroup::size).sum()
}

struct PendingGroup<'a> {
    prefix: &'a str,
    category: Category,
    members: Vec<&'a PointRecord>,
    sum_lat: f64,
    sum_lon: f64,
}

/// Partitions `points` into clusters at `precision`.
///
/// Returns an empty vector for [`Precision::None`]. Points without a prefix at
/// the requested level are left out. Groups come back in the order their key
/// first appears in the input, and members keep their relative input order.
///
/// # Examples
///
/// ```
/// use geocluster::compute::cluster::aggregate;
/// use geocluster_types::category::Category;
/// use geocluster_types::point::PointRecord;
/// use geocluster_types::precision::{GeohashPrecision, Precision};
///
/// let gh3 = GeohashPrecision::new(3).unwrap();
/// let points = vec![
///     PointRecord::new("a", Category(1), 10.0, 20.0).with_geohash(gh3, "xyz"),
///     PointRecord::new("b", Category(1), 12.0, 22.0).with_geohash(gh3, "xyz"),
///     PointRecord::new("c", Category(2), 50.0, 60.0).with_geohash(gh3, "abc"),
/// ];
///
/// let groups = aggregate(&points, Precision::Level(gh3));
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].size(), 2);
/// assert_eq!(groups[0].centroid_lat(), 11.0);
/// assert_eq!(groups[0].centroid_lon(), 21.0);
///
/// assert!(aggregate(&points, Precision::None).is_empty());
/// ```
pub fn aggregate<'a, I>(points: I, precision: Precision) -> Vec<ClusterGroup>
where
    I: IntoIterator<Item = &'a PointRecord>,
{
    let Some(level) = precision.as_level() else {
        return Vec::new();
    };

    let mut index: FxHashMap<(&'a str, Category), usize> = FxHashMap::default();
    let mut pending: Vec<PendingGroup<'a>> = Vec::new();
    let mut without_prefix = 0usize;

    for point in points {
        let Some(prefix) = point.geohash(level) else {
            without_prefix += 1;
            continue;
        };

        let slot = *index.entry((prefix, point.category)).or_insert_with(|| {
            pending.push(PendingGroup {
                prefix,
                category: point.category,
                members: Vec::new(),
                sum_lat: 0.0,
                sum_lon: 0.0,
            });
            pending.len() - 1
        });

        let group = &mut pending[slot];
        group.members.push(point);
        group.sum_lat += point.lat();
        group.sum_lon += point.lon();
    }

    if without_prefix > 0 {
        log::debug!(
            "{} points have no geohash at precision {} and were left out of clustering",
            without_prefix,
            level
        );
    }

    let groups: Vec<ClusterGroup> = pending
        .into_iter()
        .map(|group| {
            let count = group.members.len() as f64;
            ClusterGroup {
                key: ClusterKey {
                    prefix: group.prefix.to_string(),
                    category: group.category,
                },
                precision: level,
                centroid: Point::new(group.sum_lon / count, group.sum_lat / count),
                members: group.members.into_iter().cloned().collect(),
            }
        })
        .collect();

    log::debug!(
        "aggregated {} points into {} clusters at precision {}",
        total_members(&groups),
        groups.len(),
        level
    );

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gh3() -> GeohashPrecision {
        GeohashPrecision::new(3).unwrap()
    }

    fn sample() -> Vec<PointRecord> {
        vec![
            PointRecord::new("a", Category(1), 10.0, 20.0).with_geohash(gh3(), "xyz"),
            PointRecord::new("b", Category(1), 12.0, 22.0).with_geohash(gh3(), "xyz"),
            PointRecord::new("c", Category(2), 50.0, 60.0).with_geohash(gh3(), "abc"),
        ]
    }

    #[test]
    fn test_reference_scenario() {
        let groups = aggregate(&sample(), Precision::Level(gh3()));
        assert_eq!(groups.len(), 2);

        let xyz = groups
            .iter()
            .find(|g| g.prefix() == "xyz" && g.category() == Category(1))
            .unwrap();
        assert_eq!(xyz.size(), 2);
        assert!((xyz.centroid_lat() - 11.0).abs() < 1e-9);
        assert!((xyz.centroid_lon() - 21.0).abs() < 1e-9);

        let abc = groups
            .iter()
            .find(|g| g.prefix() == "abc" && g.category() == Category(2))
            .unwrap();
        assert_eq!(abc.size(), 1);
        assert_eq!(abc.centroid(), Point::new(60.0, 50.0));
    }

    #[test]
    fn test_none_precision_is_empty() {
        assert!(aggregate(&sample(), Precision::None).is_empty());
    }

    #[test]
    fn test_missing_prefix_is_excluded() {
        let groups = aggregate(&sample(), Precision::level(5).unwrap());
        assert!(groups.is_empty());

        let mut points = sample();
        points.push(PointRecord::new("bare", Category(1), 11.0, 21.0));
        let groups = aggregate(&points, Precision::Level(gh3()));
        assert_eq!(total_members(&groups), 3);
        assert!(groups.iter().all(|g| !g.contains("bare")));
    }

    #[test]
    fn test_same_prefix_different_category_splits() {
        let points = vec![
            PointRecord::new("a", Category(1), 0.0, 0.0).with_geohash(gh3(), "s00"),
            PointRecord::new("b", Category(2), 0.0, 0.0).with_geohash(gh3(), "s00"),
            PointRecord::new("c", Category(1), 2.0, 2.0).with_geohash(gh3(), "s00"),
        ];
        let groups = aggregate(&points, Precision::Level(gh3()));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key().category, Category(1));
        let member_ids: Vec<&str> = groups[0].members().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(member_ids, ["a", "c"]);
        assert_eq!(groups[1].key().category, Category(2));
    }

    #[test]
    fn test_separator_like_characters_do_not_collide() {
        // "a_1" + category 2 must stay apart from "a" + category 12 or similar
        let points = vec![
            PointRecord::new("p", Category(12), 0.0, 0.0).with_geohash(gh3(), "a_1"),
            PointRecord::new("q", Category(2), 0.0, 0.0).with_geohash(gh3(), "a_12"),
            PointRecord::new("r", Category(12), 0.0, 0.0).with_geohash(gh3(), "a"),
        ];
        let groups = aggregate(&points, Precision::Level(gh3()));
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let points = vec![
            PointRecord::new("a", Category(1), 0.0, 0.0).with_geohash(gh3(), "zzz"),
            PointRecord::new("b", Category(1), 0.0, 0.0).with_geohash(gh3(), "aaa"),
            PointRecord::new("c", Category(1), 0.0, 0.0).with_geohash(gh3(), "zzz"),
        ];
        let groups = aggregate(&points, Precision::Level(gh3()));
        let prefixes: Vec<&str> = groups.iter().map(ClusterGroup::prefix).collect();
        assert_eq!(prefixes, ["zzz", "aaa"]);
        assert!(groups.iter().all(|g| g.precision() == gh3()));
    }

    #[test]
    fn test_empty_input() {
        let points: Vec<PointRecord> = Vec::new();
        assert!(aggregate(&points, Precision::Level(gh3())).is_empty());
    }
}
