//! Validation for loaded point records.

use crate::error::{GeoclusterError, Result};
use geo::Point;
use geocluster_types::point::PointRecord;

/// Validates a position has finite, in-range longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_position;
/// use geo::Point;
///
/// let paris = Point::new(2.35, 48.85);
/// assert!(validate_position(&paris).is_ok());
///
/// // Invalid longitude
/// assert!(validate_position(&Point::new(200.0, 40.0)).is_err());
///
/// // Invalid latitude
/// assert!(validate_position(&Point::new(-74.0, 95.0)).is_err());
/// ```
pub fn validate_position(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(GeoclusterError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(GeoclusterError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(GeoclusterError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(GeoclusterError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a record identifier is usable as a store key.
pub fn validate_identifier(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(GeoclusterError::InvalidInput(
            "Point identifier cannot be empty".into(),
        ));
    }

    if id.contains('\0') {
        return Err(GeoclusterError::InvalidInput(
            "Point identifier cannot contain null bytes".into(),
        ));
    }

    Ok(())
}

/// Validates every record's position, returning the index and error of the
/// first failure.
pub fn validate_records(
    records: &[PointRecord],
) -> std::result::Result<(), (usize, GeoclusterError)> {
    for (i, record) in records.iter().enumerate() {
        validate_position(&record.position).map_err(|e| (i, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocluster_types::category::Category;

    #[test]
    fn test_valid_positions() {
        assert!(validate_position(&Point::new(0.0, 90.0)).is_ok());
        assert!(validate_position(&Point::new(0.0, -90.0)).is_ok());
        assert!(validate_position(&Point::new(180.0, 0.0)).is_ok());
        assert!(validate_position(&Point::new(-180.0, 0.0)).is_ok());
    }

    #[test]
    fn test_non_finite_positions() {
        assert!(validate_position(&Point::new(f64::NAN, 40.0)).is_err());
        assert!(validate_position(&Point::new(-74.0, f64::NAN)).is_err());
        assert!(validate_position(&Point::new(f64::INFINITY, 40.0)).is_err());
        assert!(validate_position(&Point::new(-74.0, f64::NEG_INFINITY)).is_err());
    }

    #[test]
    fn test_identifier_rules() {
        assert!(validate_identifier("a").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("a\0b").is_err());
    }

    #[test]
    fn test_validate_records_reports_index() {
        let records = vec![
            PointRecord::new("a", Category(1), 10.0, 20.0),
            PointRecord::new("b", Category(1), 95.0, 20.0),
            PointRecord::new("c", Category(1), 10.0, 20.0),
        ];
        let (index, err) = validate_records(&records).unwrap_err();
        assert_eq!(index, 1);
        assert!(matches!(err, GeoclusterError::InvalidInput(_)));
    }
}
