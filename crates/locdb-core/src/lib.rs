// crates/locdb-core/src/lib.rs

//! # locdb-core
//!
//! Diacritic-tolerant lookup of cities by (partial) name.
//!
//! A JSON snapshot (`{ "<country>": { "keys": [...], "data": [...] } }`) is
//! turned into an immutable [`LocationIndex`]: flat country and city arenas, a
//! per-letter table over the sorted single-word city names, and the
//! multi-word names kept apart for a linear scan. Built indexes can be cached
//! in a versioned binary file and reopened without re-parsing the snapshot.
//!
//! ```rust
//! use locdb_core::{BuildOptions, LocationDb, LocationIndex};
//!
//! let json = r#"{"Poland": {"keys": ["name","lat","lon"],
//!                "data": ["Łódź", [51,46], [19,27], "Zielona Góra", [51,56], [15,30]]}}"#;
//! let index = LocationIndex::from_snapshot_str(json, BuildOptions::default()).unwrap();
//! let db = LocationDb::from_index(index);
//!
//! let hits = db.search("lodz").unwrap();
//! assert_eq!(hits[0].0.name(), "Łódź");
//! assert_eq!(db.search("gora poland").unwrap().len(), 1);
//! ```

pub mod common;
pub mod db;
pub mod error;
pub mod loader;
pub mod model;
pub mod text;
pub mod traits;
// Snapshot decoding, shared by the builder entry points.
#[cfg(feature = "json")]
#[doc(hidden)]
pub mod raw;

// Re-exports
pub use crate::common::DbStats;
pub use crate::db::LocationDb;
pub use crate::error::{LocationError, Result};
pub use crate::model::{
    BuildOptions, BuildPolicy, City, CityRecord, CityTrie, Country, Dms, IndexBuilder, LocationIndex,
    QueryPlan, CACHE_SUFFIX,
};
pub use crate::text::{normalize_folded, normalize_loose};
pub use crate::traits::{CityContext, LocationSearch, NameKeys};
