//! Dataset parsing for JSON record arrays and GeoJSON FeatureCollections.
//!
//! Record fields:
//!
//! | field      | aliases                 | type             |
//! |------------|-------------------------|------------------|
//! | `id`       |                         | string or number |
//! | `type`     | `category`              | integer          |
//! | `lat`      | `latitude`              | number           |
//! | `lon`      | `lng`, `longitude`      | number           |
//! | `gh_<n>`   | `geohash_<n>`           | string           |
//! | `geohash`  |                         | object `{n: str}`|
//!
//! GeoJSON features take their position from the Point geometry and the other
//! fields from `properties`; the feature `id` is used when present.

use crate::compute::validation::{validate_identifier, validate_position, validate_records};
use crate::error::{GeoclusterError, Result};
use geocluster_types::category::Category;
use geocluster_types::point::PointRecord;
use geocluster_types::precision::GeohashPrecision;
use geojson::{FeatureCollection, GeoJson};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const LAT_FIELDS: &[&str] = &["lat", "latitude"];
const LON_FIELDS: &[&str] = &["lon", "lng", "longitude"];
const CATEGORY_FIELDS: &[&str] = &["type", "category"];
const GEOHASH_FIELD_PREFIXES: &[&str] = &["gh_", "geohash_"];

/// Anything that can produce the ordered point sequence of a dataset.
pub trait PointSource {
    fn read_points(&self) -> Result<Vec<PointRecord>>;
}

impl PointSource for Vec<PointRecord> {
    fn read_points(&self) -> Result<Vec<PointRecord>> {
        Ok(self.clone())
    }
}

impl PointSource for [PointRecord] {
    fn read_points(&self) -> Result<Vec<PointRecord>> {
        Ok(self.to_vec())
    }
}

/// Parser for dataset text with configurable diagnostics.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    warn_on_invalid_coordinates: bool,
    reject_invalid_coordinates: bool,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self {
            warn_on_invalid_coordinates: true,
            reject_invalid_coordinates: false,
        }
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the warning logged for out-of-range or non-finite coordinates.
    /// Such points are kept either way.
    pub fn warn_on_invalid_coordinates(mut self, enabled: bool) -> Self {
        self.warn_on_invalid_coordinates = enabled;
        self
    }

    /// Fail the whole load on the first out-of-range or non-finite position
    /// instead of keeping the point.
    pub fn reject_invalid_coordinates(mut self, enabled: bool) -> Self {
        self.reject_invalid_coordinates = enabled;
        self
    }

    /// Parse either format, deciding on the top-level JSON shape.
    pub fn parse_str(&self, text: &str) -> Result<Vec<PointRecord>> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| GeoclusterError::InvalidFormat(format!("Failed to parse JSON: {}", e)))?;

        let is_feature_collection =
            value.get("type").and_then(Value::as_str) == Some("FeatureCollection");

        if value.is_array() {
            self.parse_records(value)
        } else if is_feature_collection {
            let collection: FeatureCollection = serde_json::from_value(value).map_err(|e| {
                GeoclusterError::InvalidFormat(format!("Failed to parse GeoJSON: {}", e))
            })?;
            self.parse_feature_collection(collection)
        } else {
            Err(GeoclusterError::InvalidFormat(
                "Dataset must be a JSON array of records or a GeoJSON FeatureCollection".into(),
            ))
        }
    }

    /// Parse a JSON array of flat records.
    pub fn parse_json(&self, text: &str) -> Result<Vec<PointRecord>> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| GeoclusterError::InvalidFormat(format!("Failed to parse JSON: {}", e)))?;
        self.parse_records(value)
    }

    /// Parse a GeoJSON FeatureCollection of Point features.
    pub fn parse_geojson(&self, text: &str) -> Result<Vec<PointRecord>> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e| GeoclusterError::InvalidFormat(format!("Failed to parse GeoJSON: {}", e)))?;

        match geojson {
            GeoJson::FeatureCollection(collection) => self.parse_feature_collection(collection),
            _ => Err(GeoclusterError::InvalidFormat(
                "GeoJSON dataset must be a FeatureCollection".into(),
            )),
        }
    }

    /// Read and parse a dataset file.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PointRecord>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let records = self.parse_str(&text)?;
        log::info!("loaded {} points from {}", records.len(), path.display());
        Ok(records)
    }

    fn parse_records(&self, value: Value) -> Result<Vec<PointRecord>> {
        let Value::Array(entries) = value else {
            return Err(GeoclusterError::InvalidFormat(
                "Dataset must be a JSON array of records".into(),
            ));
        };

        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let obj = entry.as_object().ok_or_else(|| {
                    GeoclusterError::InvalidFormat(format!("Record {} is not a JSON object", i))
                })?;
                let lat = required_number(obj, LAT_FIELDS, i)?;
                let lon = required_number(obj, LON_FIELDS, i)?;
                let id = required_id(obj.get("id"), i)?;
                self.build_record(id, obj, lat, lon, i)
            })
            .collect::<Result<Vec<_>>>()
            .and_then(|records| self.check_positions(records))
    }

    fn check_positions(&self, records: Vec<PointRecord>) -> Result<Vec<PointRecord>> {
        if self.reject_invalid_coordinates {
            validate_records(&records).map_err(|(index, e)| {
                GeoclusterError::InvalidInput(format!(
                    "Record {} ('{}'): {}",
                    index, records[index].id, e
                ))
            })?;
        }
        Ok(records)
    }

    fn parse_feature_collection(&self, collection: FeatureCollection) -> Result<Vec<PointRecord>> {
        let empty = Map::new();
        let mut records = Vec::with_capacity(collection.features.len());

        for (i, feature) in collection.features.iter().enumerate() {
            let coords = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(geojson::Value::Point(coords)) if coords.len() >= 2 => coords,
                _ => {
                    log::warn!("Skipping feature {}: geometry is not a Point", i);
                    continue;
                }
            };
            let properties = feature.properties.as_ref().unwrap_or(&empty);

            let id = match &feature.id {
                Some(geojson::feature::Id::String(s)) => s.clone(),
                Some(geojson::feature::Id::Number(n)) => n.to_string(),
                None => required_id(properties.get("id"), i)?,
            };

            records.push(self.build_record(id, properties, coords[1], coords[0], i)?);
        }

        self.check_positions(records)
    }

    fn build_record(
        &self,
        id: String,
        fields: &Map<String, Value>,
        lat: f64,
        lon: f64,
        index: usize,
    ) -> Result<PointRecord> {
        validate_identifier(&id)
            .map_err(|e| GeoclusterError::InvalidFormat(format!("Record {}: {}", index, e)))?;

        let category = required_category(fields, index)?;
        let mut record = PointRecord::new(id, category, lat, lon);

        if self.warn_on_invalid_coordinates
            && !self.reject_invalid_coordinates
            && let Err(e) = validate_position(&record.position)
        {
            log::warn!("Record {} ('{}'): {}", index, record.id, e);
        }

        for (key, value) in fields {
            if key == "geohash" {
                if let Value::Object(levels) = value {
                    for (level, prefix) in levels {
                        insert_geohash(&mut record, level, prefix, index);
                    }
                }
                continue;
            }
            if let Some(level) = GEOHASH_FIELD_PREFIXES
                .iter()
                .find_map(|p| key.strip_prefix(p))
            {
                insert_geohash(&mut record, level, value, index);
            }
        }

        Ok(record)
    }
}

fn insert_geohash(record: &mut PointRecord, level: &str, value: &Value, index: usize) {
    let precision = match level.parse::<i64>().map(GeohashPrecision::new) {
        Ok(Ok(precision)) => precision,
        _ => {
            log::warn!(
                "Record {} ('{}'): ignoring geohash at unsupported precision '{}'",
                index,
                record.id,
                level
            );
            return;
        }
    };

    match value {
        Value::Null => {}
        Value::String(prefix) if !prefix.is_empty() => {
            record.geohashes.insert(precision, prefix.clone());
        }
        _ => log::warn!(
            "Record {} ('{}'): ignoring non-string or empty geohash at precision {}",
            index,
            record.id,
            precision
        ),
    }
}

fn lookup<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| fields.get(*name))
}

fn required_number(fields: &Map<String, Value>, names: &[&str], index: usize) -> Result<f64> {
    lookup(fields, names)
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            GeoclusterError::InvalidFormat(format!(
                "Record {} is missing numeric field '{}'",
                index, names[0]
            ))
        })
}

fn required_id(value: Option<&Value>, index: usize) -> Result<String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(GeoclusterError::InvalidFormat(format!(
            "Record {} is missing a string or numeric 'id'",
            index
        ))),
    }
}

fn required_category(fields: &Map<String, Value>, index: usize) -> Result<Category> {
    let value = lookup(fields, CATEGORY_FIELDS).ok_or_else(|| {
        GeoclusterError::InvalidFormat(format!("Record {} is missing field 'type'", index))
    })?;

    let raw = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    raw.map(Category).ok_or_else(|| {
        GeoclusterError::InvalidFormat(format!(
            "Record {} has a non-integer 'type': {}",
            index, value
        ))
    })
}

/// A dataset file on disk.
#[derive(Debug, Clone)]
pub struct DatasetFile {
    path: PathBuf,
    loader: DatasetLoader,
}

impl DatasetFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            loader: DatasetLoader::default(),
        }
    }

    pub fn with_loader(mut self, loader: DatasetLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointSource for DatasetFile {
    fn read_points(&self) -> Result<Vec<PointRecord>> {
        self.loader.load_path(&self.path)
    }
}
