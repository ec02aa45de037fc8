// crates/locdb-core/src/db.rs

//! # LocationDb
//!
//! Explicit lifecycle around a [`LocationIndex`]: create, open (from a
//! snapshot or a cache), query, drop. There is no process-global state; hold a
//! `LocationDb` wherever you need one and share it by reference across threads.

use crate::common::DbStats;
use crate::error::{LocationError, Result};
use crate::loader::cache;
use crate::model::{BuildOptions, CityTrie, LocationIndex};
use crate::traits::{CityContext, LocationSearch};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

#[cfg(feature = "json")]
use crate::loader::common_io;
#[cfg(feature = "json")]
use crate::model::CACHE_SUFFIX;

/// A location database that is either opened (holds an index) or not.
///
/// The `open_*` and `save_*` methods report success as a `bool` and log the
/// cause of a failure with `tracing::error!`. A failed open leaves the
/// database unopened, dropping whatever index it held before.
///
/// # Examples
/// ```rust,no_run
/// use locdb_core::LocationDb;
///
/// let mut db = LocationDb::new();
/// let snapshot = LocationDb::default_data_dir().join(LocationDb::default_snapshot_filename());
/// if db.open(&snapshot) {
///     for (city, country) in db.search("krakow").unwrap() {
///         println!("{}, {}", city.name(), country.name());
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct LocationDb {
    index: Option<LocationIndex>,
    trie: OnceCell<CityTrie>,
    options: BuildOptions,
}

impl LocationDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// An unopened database that builds snapshots with `options`.
    pub fn with_options(options: BuildOptions) -> Self {
        LocationDb {
            options,
            ..Self::default()
        }
    }

    /// Wraps an index that was built elsewhere.
    pub fn from_index(index: LocationIndex) -> Self {
        LocationDb {
            index: Some(index),
            ..Self::default()
        }
    }

    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn default_snapshot_filename() -> &'static str {
        "locations.json"
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    // -----------------------------------------------------------------------
    // OPEN / SAVE
    // -----------------------------------------------------------------------

    /// Builds the index from a JSON snapshot (`.gz` allowed with `compact`).
    #[cfg(feature = "json")]
    pub fn open_from_snapshot(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = LocationIndex::from_snapshot_path(path, self.options);
        self.install(result, path)
    }

    /// Loads a cache written by [`LocationDb::save_to_cache`].
    pub fn open_from_cache(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = cache::load(path);
        self.install(result, path)
    }

    /// Writes the opened index to `path`.
    pub fn save_to_cache(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = match &self.index {
            Some(index) => cache::save(index, path),
            None => Err(LocationError::NotOpened),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to save location cache");
                false
            }
        }
    }

    /// Smart open: uses `<snapshot>.<CACHE_SUFFIX>` when it is at least as new
    /// as the snapshot, otherwise builds from the snapshot and refreshes the
    /// cache. A cache that cannot be written only costs a warning.
    #[cfg(feature = "json")]
    pub fn open(&mut self, snapshot: impl AsRef<Path>) -> bool {
        let snapshot = snapshot.as_ref();
        let cache_path = common_io::get_cache_path(snapshot, CACHE_SUFFIX);

        if common_io::is_cache_fresh(snapshot, &cache_path) {
            match cache::load(&cache_path) {
                Ok(index) => {
                    debug!(cache = %cache_path.display(), "using location cache");
                    return self.install(Ok(index), &cache_path);
                }
                Err(e) => warn!(cache = %cache_path.display(), error = %e, "rejected location cache, rebuilding"),
            }
        } else {
            debug!(cache = %cache_path.display(), "location cache missing or stale");
        }

        if !self.open_from_snapshot(snapshot) {
            return false;
        }
        if let Some(index) = &self.index {
            if let Err(e) = cache::save(index, &cache_path) {
                warn!(cache = %cache_path.display(), error = %e, "could not write location cache");
            }
        }
        true
    }

    /// Drops the index.
    pub fn close(&mut self) {
        self.index = None;
        self.trie = OnceCell::new();
    }

    fn install(&mut self, result: Result<LocationIndex>, path: &Path) -> bool {
        self.trie = OnceCell::new();
        match result {
            Ok(index) => {
                self.index = Some(index);
                true
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to open location database");
                self.index = None;
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // QUERIES
    // -----------------------------------------------------------------------

    pub fn is_opened(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<&LocationIndex> {
        self.index.as_ref()
    }

    fn opened(&self) -> Result<&LocationIndex> {
        self.index.as_ref().ok_or(LocationError::NotOpened)
    }

    /// Cities matching every token of `text`, each with its country.
    ///
    /// `Err(NotOpened)` before a successful open; an empty `Vec` simply means
    /// nothing matched (or the query does not start with a letter).
    pub fn search(&self, text: &str) -> Result<Vec<CityContext<'_>>> {
        Ok(self.opened()?.search(text))
    }

    /// Cities whose folded name starts with `prefix`.
    ///
    /// The trie is built on first use and kept until the next open.
    pub fn starts_with(&self, prefix: &str) -> Result<Vec<CityContext<'_>>> {
        let index = self.opened()?;
        let trie = self.trie.get_or_init(|| index.trie());
        Ok(index.resolve(&trie.find_any(prefix)))
    }

    pub fn stats(&self) -> Result<DbStats> {
        Ok(self.opened()?.stats())
    }
}
