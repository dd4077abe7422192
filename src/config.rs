//! Presentation and session configuration
//!
//! Serializable settings for marker glyphs, the empty-dataset viewport and
//! cluster memoization. Loadable from JSON, or TOML with the `toml` feature.
use geo::Point;
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Session configuration
///
/// # Example
///
/// ```rust
/// use geocluster::Config;
///
/// let config = Config::default();
/// assert_eq!(config.point_radius_px, 6.0);
///
/// let json = r#"{
///     "cluster_min_size_px": 16.0,
///     "cluster_max_size_px": 48.0,
///     "memoize_clusters": false
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert!(!config.memoize_clusters);
/// assert_eq!(config.cluster_size_scale, 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Radius of the circular glyph drawn for single points
    #[serde(default = "Config::default_point_radius_px")]
    pub point_radius_px: f64,

    /// Smallest edge length of a cluster square
    #[serde(default = "Config::default_cluster_min_size_px")]
    pub cluster_min_size_px: f64,

    /// Largest edge length of a cluster square
    #[serde(default = "Config::default_cluster_max_size_px")]
    pub cluster_max_size_px: f64,

    /// Growth factor applied to the square root of the member count
    #[serde(default = "Config::default_cluster_size_scale")]
    pub cluster_size_scale: f64,

    /// Latitude of the initial viewport when no points are visible
    #[serde(default)]
    pub fallback_center_lat: f64,

    /// Longitude of the initial viewport when no points are visible
    #[serde(default)]
    pub fallback_center_lon: f64,

    /// Cache cluster results per (category set, precision)
    #[serde(default = "Config::default_true")]
    pub memoize_clusters: bool,

    /// Most cluster results kept when memoizing; the least recently used
    /// selection is evicted first
    #[serde(default = "Config::default_cluster_cache_capacity")]
    pub cluster_cache_capacity: usize,

    /// Log a warning for out-of-range coordinates while loading.
    ///
    /// Only applies to datasets the session loads itself through
    /// `SessionBuilder::dataset_path`. A `PointStore` handed to
    /// `SessionBuilder::store` was parsed by whatever `DatasetLoader` built it.
    #[serde(default = "Config::default_true")]
    pub warn_on_invalid_coordinates: bool,
}

impl Config {
    const fn default_point_radius_px() -> f64 {
        6.0
    }

    const fn default_cluster_min_size_px() -> f64 {
        20.0
    }

    const fn default_cluster_max_size_px() -> f64 {
        60.0
    }

    const fn default_cluster_size_scale() -> f64 {
        4.0
    }

    const fn default_cluster_cache_capacity() -> usize {
        16
    }

    const fn default_true() -> bool {
        true
    }

    pub fn with_point_radius(mut self, radius_px: f64) -> Self {
        self.point_radius_px = radius_px;
        self
    }

    /// Set the clamp range for cluster glyphs.
    pub fn with_cluster_size_range(mut self, min_px: f64, max_px: f64) -> Self {
        assert!(min_px <= max_px, "Cluster minimum size must not exceed maximum");
        self.cluster_min_size_px = min_px;
        self.cluster_max_size_px = max_px;
        self
    }

    pub fn with_cluster_size_scale(mut self, scale: f64) -> Self {
        self.cluster_size_scale = scale;
        self
    }

    pub fn with_fallback_center(mut self, lat: f64, lon: f64) -> Self {
        self.fallback_center_lat = lat;
        self.fallback_center_lon = lon;
        self
    }

    pub fn with_memoization(mut self, enabled: bool) -> Self {
        self.memoize_clusters = enabled;
        self
    }

    pub fn with_cluster_cache_capacity(mut self, capacity: usize) -> Self {
        self.cluster_cache_capacity = capacity;
        self
    }

    pub fn with_coordinate_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_invalid_coordinates = enabled;
        self
    }

    /// Fallback viewport center as a `geo::Point` (x = lon, y = lat).
    pub fn fallback_center(&self) -> Point {
        Point::new(self.fallback_center_lon, self.fallback_center_lat)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        let sizes = [
            ("point_radius_px", self.point_radius_px),
            ("cluster_min_size_px", self.cluster_min_size_px),
            ("cluster_max_size_px", self.cluster_max_size_px),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be finite and positive, got {}", name, value));
            }
        }

        if !self.cluster_size_scale.is_finite() || self.cluster_size_scale < 0.0 {
            return Err(format!(
                "cluster_size_scale must be finite and non-negative, got {}",
                self.cluster_size_scale
            ));
        }

        if self.cluster_min_size_px > self.cluster_max_size_px {
            return Err(format!(
                "cluster_min_size_px ({}) exceeds cluster_max_size_px ({})",
                self.cluster_min_size_px, self.cluster_max_size_px
            ));
        }

        if self.cluster_cache_capacity == 0 {
            return Err("cluster_cache_capacity must be at least 1".into());
        }

        if !(-90.0..=90.0).contains(&self.fallback_center_lat) {
            return Err(format!(
                "Fallback latitude out of range [-90.0, 90.0]: {}",
                self.fallback_center_lat
            ));
        }

        if !(-180.0..=180.0).contains(&self.fallback_center_lon) {
            return Err(format!(
                "Fallback longitude out of range [-180.0, 180.0]: {}",
                self.fallback_center_lon
            ));
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            point_radius_px: Self::default_point_radius_px(),
            cluster_min_size_px: Self::default_cluster_min_size_px(),
            cluster_max_size_px: Self::default_cluster_max_size_px(),
            cluster_size_scale: Self::default_cluster_size_scale(),
            fallback_center_lat: 0.0,
            fallback_center_lon: 0.0,
            memoize_clusters: true,
            cluster_cache_capacity: Self::default_cluster_cache_capacity(),
            warn_on_invalid_coordinates: true,
        }
    }
}
