//! Category membership filter.

use geocluster_types::category::CategorySet;
use geocluster_types::point::PointRecord;

/// Returns, in input order, every point whose category is in `selected`.
///
/// No validation is applied to category values: unknown categories match
/// only if the selection contains the same raw value.
///
/// # Examples
///
/// ```
/// use geocluster::compute::filter::filter_by_category;
/// use geocluster_types::category::{Category, CategorySet};
/// use geocluster_types::point::PointRecord;
///
/// let points = vec![
///     PointRecord::new("a", Category(1), 10.0, 20.0),
///     PointRecord::new("b", Category(2), 11.0, 21.0),
///     PointRecord::new("c", Category(1), 12.0, 22.0),
/// ];
///
/// let selected: CategorySet = [1].into_iter().collect();
/// let ids: Vec<&str> = filter_by_category(&points, &selected)
///     .iter()
///     .map(|p| p.id.as_str())
///     .collect();
/// assert_eq!(ids, ["a", "c"]);
/// ```
pub fn filter_by_category<'a, I>(points: I, selected: &CategorySet) -> Vec<&'a PointRecord>
where
    I: IntoIterator<Item = &'a PointRecord>,
{
    if selected.is_empty() {
        return Vec::new();
    }

    points
        .into_iter()
        .filter(|point| selected.contains(point.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocluster_types::category::Category;

    fn sample() -> Vec<PointRecord> {
        vec![
            PointRecord::new("a", Category(1), 10.0, 20.0),
            PointRecord::new("b", Category(1), 12.0, 22.0),
            PointRecord::new("c", Category(2), 50.0, 60.0),
            PointRecord::new("d", Category(99), 0.0, 0.0),
        ]
    }

    #[test]
    fn test_empty_selection_yields_nothing() {
        let points = sample();
        assert!(filter_by_category(&points, &CategorySet::empty()).is_empty());
    }

    #[test]
    fn test_preserves_order() {
        let points = sample();
        let selected: CategorySet = [2, 1].into_iter().collect();
        let ids: Vec<&str> = filter_by_category(&points, &selected)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_category_matches_by_raw_value() {
        let points = sample();
        assert!(filter_by_category(&points, &CategorySet::all())
            .iter()
            .all(|p| p.id != "d"));

        let selected: CategorySet = [99].into_iter().collect();
        let hits = filter_by_category(&points, &selected);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "d");
    }

    #[test]
    fn test_accepts_borrowed_iterators() {
        let points = sample();
        let refs: Vec<&PointRecord> = points.iter().collect();
        let selected: CategorySet = [1].into_iter().collect();
        assert_eq!(filter_by_category(refs.iter().copied(), &selected).len(), 2);
    }
}
