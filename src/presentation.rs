//! Marker descriptors for the rendering surface.
//!
//! Single points become fixed-size circles colored by category. Clusters with
//! more than one member become squares whose edge grows with the member count
//! (clamped to the configured range) and carry the count as a label. A
//! cluster of one is drawn exactly like its only point.

use crate::compute::cluster::ClusterGroup;
use crate::config::Config;
use crate::error::{GeoclusterError, Result};
use geo::Point;
use geocluster_types::category::Category;
use geocluster_types::point::PointRecord;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;
use smallvec::SmallVec;

/// Viewport center used when there is nothing to average.
pub const DEFAULT_CENTER: Point = Point(geo::Coord { x: 0.0, y: 0.0 });

/// Color of categories outside the fixed palette.
pub const FALLBACK_COLOR: &str = "#808080";

const PALETTE: [&str; 10] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#bfef45",
    "#469990", "#9a6324",
];

/// Fixed category color, gray for anything outside 1..=10.
///
/// ```
/// use geocluster::presentation::{FALLBACK_COLOR, category_color};
/// use geocluster_types::category::Category;
///
/// assert_eq!(category_color(Category(1)), "#e6194b");
/// assert_eq!(category_color(Category(0)), FALLBACK_COLOR);
/// assert_eq!(category_color(Category(11)), FALLBACK_COLOR);
/// ```
pub fn category_color(category: Category) -> &'static str {
    if !category.is_known() {
        return FALLBACK_COLOR;
    }
    let start = *Category::KNOWN.start();
    PALETTE
        .get((category.value() - start) as usize)
        .copied()
        .unwrap_or(FALLBACK_COLOR)
}

/// Glyph to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MarkerStyle {
    Circle {
        color: &'static str,
        radius_px: f64,
    },
    Square {
        color: &'static str,
        size_px: f64,
        label: String,
    },
}

impl MarkerStyle {
    pub fn color(&self) -> &'static str {
        match self {
            MarkerStyle::Circle { color, .. } | MarkerStyle::Square { color, .. } => *color,
        }
    }
}

/// One labeled line of popup content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupField {
    pub label: &'static str,
    pub value: String,
}

impl PopupField {
    fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// What a marker was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerSource {
    Point { id: String },
    Cluster { prefix: String, size: usize },
}

/// Everything the map widget needs to draw and annotate one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    /// Position (x = lon, y = lat)
    pub position: Point,
    pub category: Category,
    pub style: MarkerStyle,
    pub popup: SmallVec<[PopupField; 5]>,
    pub source: MarkerSource,
}

impl MarkerDescriptor {
    pub fn lat(&self) -> f64 {
        self.position.y()
    }

    pub fn lon(&self) -> f64 {
        self.position.x()
    }

    /// Popup value for `label`, if present.
    pub fn popup_value(&self, label: &str) -> Option<&str> {
        self.popup
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    /// GeoJSON Point feature carrying style and popup as properties.
    pub fn to_feature(&self) -> Result<Feature> {
        let mut properties = match serde_json::to_value(&self.style) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => JsonObject::new(),
            Err(e) => {
                return Err(GeoclusterError::SerializationErrorWithContext(format!(
                    "Failed to serialize marker style: {}",
                    e
                )));
            }
        };

        let popup: JsonObject = self
            .popup
            .iter()
            .map(|f| (f.label.to_string(), serde_json::Value::String(f.value.clone())))
            .collect();
        properties.insert("popup".into(), serde_json::Value::Object(popup));
        properties.insert("category".into(), self.category.value().into());

        let source = serde_json::to_value(&self.source).map_err(|e| {
            GeoclusterError::SerializationErrorWithContext(format!(
                "Failed to serialize marker source: {}",
                e
            ))
        })?;
        properties.insert("source".into(), source);

        Ok(Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::Point(vec![
                self.position.x(),
                self.position.y(),
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        })
    }
}

/// Export markers as a GeoJSON FeatureCollection.
pub fn markers_to_feature_collection(markers: &[MarkerDescriptor]) -> Result<FeatureCollection> {
    let features = markers
        .iter()
        .map(MarkerDescriptor::to_feature)
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Arithmetic-mean position of `points`, or [`DEFAULT_CENTER`] when empty.
///
/// ```
/// use geocluster::presentation::{DEFAULT_CENTER, compute_center};
/// use geocluster_types::category::Category;
/// use geocluster_types::point::PointRecord;
///
/// let points = vec![
///     PointRecord::new("a", Category(1), 10.0, 20.0),
///     PointRecord::new("b", Category(2), 20.0, 40.0),
/// ];
/// let center = compute_center(&points);
/// assert_eq!((center.y(), center.x()), (15.0, 30.0));
///
/// let none: Vec<PointRecord> = Vec::new();
/// assert_eq!(compute_center(&none), DEFAULT_CENTER);
/// ```
pub fn compute_center<'a, I>(points: I) -> Point
where
    I: IntoIterator<Item = &'a PointRecord>,
{
    compute_center_or(points, DEFAULT_CENTER)
}

/// Like [`compute_center`] with a caller-chosen fallback.
pub fn compute_center_or<'a, I>(points: I, fallback: Point) -> Point
where
    I: IntoIterator<Item = &'a PointRecord>,
{
    let (mut sum_lat, mut sum_lon, mut count) = (0.0, 0.0, 0usize);
    for point in points {
        sum_lat += point.lat();
        sum_lon += point.lon();
        count += 1;
    }

    if count == 0 {
        return fallback;
    }
    Point::new(sum_lon / count as f64, sum_lat / count as f64)
}

/// Builds marker descriptors using the glyph settings of a [`Config`].
#[derive(Debug, Clone)]
pub struct Presenter {
    point_radius_px: f64,
    cluster_min_size_px: f64,
    cluster_max_size_px: f64,
    cluster_size_scale: f64,
    fallback_center: Point,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Presenter {
    pub fn new(config: &Config) -> Self {
        Self {
            point_radius_px: config.point_radius_px,
            cluster_min_size_px: config.cluster_min_size_px,
            cluster_max_size_px: config.cluster_max_size_px,
            cluster_size_scale: config.cluster_size_scale,
            fallback_center: config.fallback_center(),
        }
    }

    /// Edge length of a cluster square holding `count` members.
    pub fn cluster_glyph_size(&self, count: usize) -> f64 {
        let size = self.cluster_min_size_px + self.cluster_size_scale * (count as f64).sqrt();
        size.max(self.cluster_min_size_px)
            .min(self.cluster_max_size_px)
    }

    pub fn point_marker(&self, point: &PointRecord) -> MarkerDescriptor {
        let popup = [
            PopupField::new("id", &point.id),
            PopupField::new("category", point.category),
            PopupField::new("latitude", format!("{:.6}", point.lat())),
            PopupField::new("longitude", format!("{:.6}", point.lon())),
        ];

        MarkerDescriptor {
            position: point.position,
            category: point.category,
            style: MarkerStyle::Circle {
                color: category_color(point.category),
                radius_px: self.point_radius_px,
            },
            popup: popup.into_iter().collect(),
            source: MarkerSource::Point {
                id: point.id.clone(),
            },
        }
    }

    pub fn cluster_marker(&self, cluster: &ClusterGroup) -> MarkerDescriptor {
        if let [only] = cluster.members() {
            return self.point_marker(only);
        }

        let size = cluster.size();
        let popup = [
            PopupField::new("geohash", cluster.prefix()),
            PopupField::new("category", cluster.category()),
            PopupField::new("count", size),
            PopupField::new("latitude", format!("{:.6}", cluster.centroid_lat())),
            PopupField::new("longitude", format!("{:.6}", cluster.centroid_lon())),
        ];

        MarkerDescriptor {
            position: cluster.centroid(),
            category: cluster.category(),
            style: MarkerStyle::Square {
                color: category_color(cluster.category()),
                size_px: self.cluster_glyph_size(size),
                label: size.to_string(),
            },
            popup: popup.into_iter().collect(),
            source: MarkerSource::Cluster {
                prefix: cluster.prefix().to_string(),
                size,
            },
        }
    }

    pub fn point_markers<'a, I>(&self, points: I) -> Vec<MarkerDescriptor>
    where
        I: IntoIterator<Item = &'a PointRecord>,
    {
        points.into_iter().map(|p| self.point_marker(p)).collect()
    }

    pub fn cluster_markers(&self, clusters: &[ClusterGroup]) -> Vec<MarkerDescriptor> {
        clusters.iter().map(|c| self.cluster_marker(c)).collect()
    }

    /// Initial viewport center, falling back to the configured coordinate.
    pub fn center<'a, I>(&self, points: I) -> Point
    where
        I: IntoIterator<Item = &'a PointRecord>,
    {
        compute_center_or(points, self.fallback_center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::cluster::aggregate;
    use geocluster_types::precision::{GeohashPrecision, Precision};

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
    fn test_palette_is_total() {
        for value in -5..20 {
            let color = category_color(Category(value));
            assert!(color.starts_with('#'));
            if Category(value).is_known() {
                assert_ne!(color, FALLBACK_COLOR);
            } else {
                assert_eq!(color, FALLBACK_COLOR);
            }
        }
    }

    #[test]
    fn test_point_marker_contents() {
        let presenter = Presenter::default();
        let marker = presenter.point_marker(&sample()[0]);
        assert_eq!(marker.lat(), 10.0);
        assert_eq!(marker.lon(), 20.0);
        assert_eq!(
            marker.style,
            MarkerStyle::Circle {
                color: "#e6194b",
                radius_px: 6.0
            }
        );
        assert_eq!(marker.popup_value("id"), Some("a"));
        assert_eq!(marker.popup_value("category"), Some("1"));
        assert_eq!(marker.popup_value("latitude"), Some("10.000000"));
        assert_eq!(marker.popup_value("longitude"), Some("20.000000"));
    }

    #[test]
    fn test_cluster_marker_contents() {
        let presenter = Presenter::default();
        let groups = aggregate(&sample(), Precision::Level(gh3()));

        let marker = presenter.cluster_marker(&groups[0]);
        assert_eq!(marker.position, Point::new(21.0, 11.0));
        match &marker.style {
            MarkerStyle::Square { color, label, size_px } => {
                assert_eq!(*color, category_color(Category(1)));
                assert_eq!(label, "2");
                assert_eq!(*size_px, presenter.cluster_glyph_size(2));
            }
            other => panic!("expected square glyph, got {:?}", other),
        }
        assert_eq!(marker.popup_value("geohash"), Some("xyz"));
        assert_eq!(marker.popup_value("count"), Some("2"));
        assert_eq!(
            marker.source,
            MarkerSource::Cluster {
                prefix: "xyz".into(),
                size: 2
            }
        );
    }

    #[test]
    fn test_singleton_cluster_renders_as_point() {
        let presenter = Presenter::default();
        let groups = aggregate(&sample(), Precision::Level(gh3()));
        let marker = presenter.cluster_marker(&groups[1]);
        assert!(matches!(marker.style, MarkerStyle::Circle { .. }));
        assert_eq!(marker.source, MarkerSource::Point { id: "c".into() });
    }

    #[test]
    fn test_glyph_size_is_monotone_and_clamped() {
        let presenter = Presenter::default();
        let mut previous = 0.0;
        for count in 1..10_000 {
            let size = presenter.cluster_glyph_size(count);
            assert!(size >= previous);
            assert!((20.0..=60.0).contains(&size));
            previous = size;
        }
        assert_eq!(presenter.cluster_glyph_size(1_000_000), 60.0);
    }

    #[test]
    fn test_center_fallback_from_config() {
        let presenter = Presenter::new(&Config::default().with_fallback_center(40.0, -3.7));
        let none: Vec<PointRecord> = Vec::new();
        let center = presenter.center(&none);
        assert_eq!((center.y(), center.x()), (40.0, -3.7));

        let center = presenter.center(&sample());
        assert!((center.y() - 24.0).abs() < 1e-9);
        assert!((center.x() - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_geojson_export() {
        let presenter = Presenter::default();
        let groups = aggregate(&sample(), Precision::Level(gh3()));
        let markers = presenter.cluster_markers(&groups);
        let collection = markers_to_feature_collection(&markers).unwrap();
        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        let properties = first.properties.as_ref().unwrap();
        assert_eq!(properties["shape"], "square");
        assert_eq!(properties["label"], "2");
        assert_eq!(properties["popup"]["geohash"], "xyz");
        assert_eq!(properties["source"]["kind"], "cluster");
        match &first.geometry.as_ref().unwrap().value {
            geojson::Value::Point(coords) => assert_eq!(coords, &vec![21.0, 11.0]),
            other => panic!("expected point geometry, got {:?}", other),
        }
    }
}
