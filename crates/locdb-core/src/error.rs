// crates/locdb-core/src/error.rs
use thiserror::Error;

/// Errors produced while building, loading, caching or querying a location index.
#[derive(Debug, Error)]
pub enum LocationError {
    /// A snapshot or cache file does not exist or cannot be opened.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot is not well-formed JSON.
    #[cfg(feature = "json")]
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The cache payload could not be encoded or decoded.
    #[error("cache encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    /// A snapshot record is missing fields, has the wrong shape or an unknown key.
    #[error("data format error in '{country}': {reason}")]
    DataFormat { country: String, reason: String },

    /// The cache blob does not start with the expected header.
    #[error("not a location cache: {0}")]
    CacheFormat(String),

    /// The cache was written by an incompatible format version.
    #[error("cache version {found} is not supported (expected {expected})")]
    CacheVersion { found: u16, expected: u16 },

    /// Decoded data violates an index invariant.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A query was issued before any index was opened.
    #[error("location database is not opened")]
    NotOpened,
}

impl LocationError {
    pub(crate) fn data_format(country: impl Into<String>, reason: impl Into<String>) -> Self {
        LocationError::DataFormat {
            country: country.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocationError>;
