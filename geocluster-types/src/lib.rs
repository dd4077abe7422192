//! # geocluster-types
//!
//! Core value types for the geocluster crate.
//!
//! - **Category types**: `Category`, `CategorySet`
//! - **Precision types**: `GeohashPrecision`, `Precision`
//! - **Point types**: `PointRecord`
//!
//! All types are serializable with Serde and positions are stored as the `geo`
//! crate's `Point` (x = longitude, y = latitude).
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::category::Category;
//! use geocluster_types::point::PointRecord;
//! use geocluster_types::precision::GeohashPrecision;
//!
//! let level = GeohashPrecision::new(3).unwrap();
//! let record = PointRecord::new("a", Category(1), 10.0, 20.0).with_geohash(level, "xyz");
//! assert_eq!(record.geohash(level), Some("xyz"));
//! ```

pub mod category;
pub mod point;
pub mod precision;

pub use geo;
