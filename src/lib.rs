//! Category filtering and geohash-prefix clustering for point datasets drawn on
//! interactive maps.
//!
//! ```rust
//! use geocluster::{PointStore, SessionBuilder, SelectionState};
//! use geocluster::prelude::*;
//!
//! let store = PointStore::from_json_str(r#"[
//!     {"id": "a", "type": 1, "lat": 10.0, "lon": 20.0, "gh_3": "xyz"},
//!     {"id": "b", "type": 1, "lat": 12.0, "lon": 22.0, "gh_3": "xyz"},
//!     {"id": "c", "type": 2, "lat": 50.0, "lon": 60.0, "gh_3": "abc"}
//! ]"#)?;
//!
//! let session = SessionBuilder::new()
//!     .store(store)
//!     .selection(SelectionState::default().with_precision(Precision::level(3)?))
//!     .build()?;
//!
//! let clusters = session.clusters();
//! assert_eq!(clusters.len(), 2);
//! assert_eq!(clusters[0].size(), 2);
//! # Ok::<(), geocluster::GeoclusterError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod presentation;
pub mod selection;
pub mod session;
pub mod store;

pub use builder::SessionBuilder;
pub use compute::{ClusterGroup, ClusterKey, aggregate, filter_by_category, total_members};
pub use config::Config;
pub use error::{GeoclusterError, Result};
pub use presentation::{
    MarkerDescriptor, MarkerSource, MarkerStyle, PopupField, Presenter, category_color,
    compute_center, markers_to_feature_collection,
};
pub use selection::SelectionState;
pub use session::{MapSession, RenderFrame, SessionStats};
pub use store::{DatasetFile, DatasetLoader, PointSource, PointStore};

pub use geo::Point;
pub use geocluster_types::category::{Category, CategorySet};
pub use geocluster_types::point::PointRecord;
pub use geocluster_types::precision::{GeohashPrecision, Precision, PrecisionError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeoclusterError, MapSession, Result, SessionBuilder};

    pub use crate::{Category, CategorySet, GeohashPrecision, PointRecord, Precision};

    pub use crate::{Config, SelectionState};

    pub use crate::{ClusterGroup, aggregate, filter_by_category};

    pub use crate::{MarkerDescriptor, Presenter, compute_center};

    pub use crate::PointStore;

    pub use geo::Point;
}
