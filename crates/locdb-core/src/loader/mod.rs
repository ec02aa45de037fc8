// crates/locdb-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (files, decompression) and delegates to the
//! specific parsers: the JSON snapshot (canonical source) and the binary cache.

pub mod cache;
pub mod common_io;
mod snapshot;

pub use cache::{CompressionMode, CACHE_MAGIC, CACHE_VERSION};
pub use common_io::{get_cache_path, is_cache_fresh};
