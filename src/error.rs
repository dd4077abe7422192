//! Error types for geocluster.

use geocluster_types::precision::PrecisionError;

/// Errors produced while loading datasets or configuring a session.
///
/// Filtering, clustering and presentation never fail; only the edges of the
/// crate (input parsing, configuration) return these.
#[derive(Debug, thiserror::Error)]
pub enum GeoclusterError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid geohash precision: {0}")]
    InvalidPrecision(#[from] PrecisionError),

    #[error("Duplicate point identifier: {0}")]
    DuplicateId(String),

    #[error("Invalid dataset format: {0}")]
    InvalidFormat(String),

    #[error("Serialization error: {0}")]
    SerializationErrorWithContext(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GeoclusterError>;
