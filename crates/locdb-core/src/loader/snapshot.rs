// crates/locdb-core/src/loader/snapshot.rs

// ---------------------------------------------------------------------------
// FILE GUARD: This entire file is skipped if 'json' feature is missing.
// ---------------------------------------------------------------------------
#![cfg(feature = "json")]

use super::common_io;
use crate::error::Result;
use crate::model::{BuildOptions, IndexBuilder, LocationIndex};
use crate::raw;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;
use tracing::info;

impl IndexBuilder {
    /// Parses a snapshot from `reader` and feeds every country into the builder.
    pub fn read_json<R: Read>(&mut self, reader: R) -> Result<()> {
        let root: Map<String, Value> = serde_json::from_reader(reader)?;
        raw::decode_snapshot(self, root)
    }

    pub fn read_json_str(&mut self, json: &str) -> Result<()> {
        let root: Map<String, Value> = serde_json::from_str(json)?;
        raw::decode_snapshot(self, root)
    }
}

impl LocationIndex {
    /// Builds an index from snapshot text.
    ///
    /// # Examples
    /// ```rust
    /// use locdb_core::{BuildOptions, LocationIndex, LocationSearch};
    ///
    /// let json = r#"{"Poland": {"keys": ["name","lat","lon"],
    ///                "data": ["Warsaw", [52,13], [21,0,36]]}}"#;
    /// let index = LocationIndex::from_snapshot_str(json, BuildOptions::default()).unwrap();
    /// assert_eq!(index.search("warsaw").len(), 1);
    /// ```
    pub fn from_snapshot_str(json: &str, options: BuildOptions) -> Result<Self> {
        let mut builder = IndexBuilder::new(options);
        builder.read_json_str(json)?;
        builder.build()
    }

    pub fn from_snapshot_reader<R: Read>(reader: R, options: BuildOptions) -> Result<Self> {
        let mut builder = IndexBuilder::new(options);
        builder.read_json(reader)?;
        builder.build()
    }

    /// Builds an index from a snapshot file; `.gz` files are decompressed on the fly.
    pub fn from_snapshot_path(path: impl AsRef<Path>, options: BuildOptions) -> Result<Self> {
        let path = path.as_ref();
        let reader = common_io::open_stream(path)?;
        let index = Self::from_snapshot_reader(reader, options)?;
        info!(
            path = %path.display(),
            countries = index.countries.len(),
            cities = index.cities.len(),
            "built location index from snapshot"
        );
        Ok(index)
    }
}
