//! Pure computations over point records: validation, category filtering and
//! geohash-prefix clustering.

pub mod cluster;
pub mod filter;
pub mod validation;

pub use cluster::{ClusterGroup, ClusterKey, aggregate, total_members};
pub use filter::filter_by_category;
