// crates/locdb-core/src/loader/cache.rs

//! Binary cache of a built [`LocationIndex`].
//!
//! Layout: a small uncompressed header (magic, format version, compression
//! flag) followed by the bincode image of the index, gzip-compressed when the
//! `compact` feature is on. The format is private to this crate; the JSON
//! snapshot stays the canonical source and a cache that fails to load is simply
//! rebuilt from it.

use crate::error::{LocationError, Result};
use crate::model::load::codec;
use crate::model::LocationIndex;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

pub const CACHE_MAGIC: [u8; 4] = *b"LCDB";
/// Bumped whenever the serialized layout or the key normalization changes.
/// Caches with any other version are rejected.
pub const CACHE_VERSION: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl Default for CompressionMode {
    fn default() -> Self {
        #[cfg(feature = "compact")]
        let mode = CompressionMode::Gzip;
        #[cfg(not(feature = "compact"))]
        let mode = CompressionMode::None;
        mode
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheHeader {
    magic: [u8; 4],
    version: u16,
    compressed: bool,
}

/// Writes `index` to `path` with the default compression.
pub fn save(index: &LocationIndex, path: &Path) -> Result<()> {
    save_with(index, path, CompressionMode::default())
}

/// Writes `index` to `path`.
///
/// The blob is written to a sibling temporary file first and renamed into
/// place, so readers never observe a half-written cache.
pub fn save_with(index: &LocationIndex, path: &Path, compression: CompressionMode) -> Result<()> {
    let tmp = tmp_path(path);
    let result = write_cache(index, &tmp, compression).and_then(|()| fs::rename(&tmp, path).map_err(Into::into));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    debug!(path = %path.display(), ?compression, "wrote location cache");
    Ok(())
}

/// Reads a cache written by [`save`].
pub fn load(path: &Path) -> Result<LocationIndex> {
    let file = File::open(path)
        .map_err(|e| LocationError::NotFound(format!("{}: {e}", path.display())))?;
    let mut reader = BufReader::new(file);

    let header: CacheHeader = codec()
        .deserialize_from(&mut reader)
        .map_err(|e| LocationError::CacheFormat(format!("{}: {e}", path.display())))?;
    if header.magic != CACHE_MAGIC {
        return Err(LocationError::CacheFormat(format!(
            "{}: bad magic {:?}",
            path.display(),
            header.magic
        )));
    }
    if header.version != CACHE_VERSION {
        return Err(LocationError::CacheVersion {
            found: header.version,
            expected: CACHE_VERSION,
        });
    }

    let index = decode_payload(reader, header.compressed)?;
    debug!(path = %path.display(), cities = index.cities.len(), "loaded location cache");
    Ok(index)
}

fn write_cache(index: &LocationIndex, path: &Path, compression: CompressionMode) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let header = CacheHeader {
        magic: CACHE_MAGIC,
        version: CACHE_VERSION,
        compressed: compression == CompressionMode::Gzip,
    };
    codec().serialize_into(&mut writer, &header)?;

    match compression {
        CompressionMode::None => {
            index.write_to(&mut writer)?;
            writer.flush()?;
        }
        #[cfg(feature = "compact")]
        CompressionMode::Gzip => {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            index.write_to(&mut encoder)?;
            encoder.finish()?.flush()?;
        }
        #[cfg(not(feature = "compact"))]
        CompressionMode::Gzip => {
            return Err(LocationError::InvalidData(
                "Gzip requested but 'compact' disabled".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(feature = "compact")]
fn decode_payload<R: Read>(reader: R, compressed: bool) -> Result<LocationIndex> {
    if compressed {
        LocationIndex::read_from(GzDecoder::new(reader))
    } else {
        LocationIndex::read_from(reader)
    }
}

#[cfg(not(feature = "compact"))]
fn decode_payload<R: Read>(reader: R, compressed: bool) -> Result<LocationIndex> {
    if compressed {
        return Err(LocationError::InvalidData(
            "cache is gzip-compressed but 'compact' is disabled".into(),
        ));
    }
    LocationIndex::read_from(reader)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildOptions, CityRecord, IndexBuilder};
    use crate::traits::LocationSearch;

    fn sample() -> LocationIndex {
        let mut builder = IndexBuilder::new(BuildOptions::default());
        let id = builder.add_country("Poland").unwrap();
        let record = CityRecord {
            name: "Warsaw".into(),
            lat: vec![52.0, 13.0],
            lon: vec![21.0, 0.0, 36.0],
        };
        builder.add_city(id, 0, record).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn plain_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        save_with(&sample(), &path, CompressionMode::None).unwrap();
        let back = load(&path).unwrap();
        assert_eq!(back.stats(), sample().stats());
        assert!(!tmp_path(&path).exists());
    }

    #[cfg(feature = "compact")]
    #[test]
    fn gzip_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin.gz");
        save_with(&sample(), &path, CompressionMode::Gzip).unwrap();
        assert_eq!(load(&path).unwrap().search("warsaw").len(), 1);
    }

    #[test]
    fn foreign_file_is_not_a_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        fs::write(&path, b"{\"Poland\": {}}").unwrap();
        assert!(matches!(load(&path), Err(LocationError::CacheFormat(_))));
    }

    #[test]
    fn other_versions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        let header = CacheHeader {
            magic: CACHE_MAGIC,
            version: CACHE_VERSION + 1,
            compressed: false,
        };
        let mut bytes = codec().serialize(&header).unwrap();
        bytes.extend(sample().to_bytes().unwrap());
        fs::write(&path, bytes).unwrap();

        match load(&path) {
            Err(LocationError::CacheVersion { found, expected }) => {
                assert_eq!(found, CACHE_VERSION + 1);
                assert_eq!(expected, CACHE_VERSION);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn failed_rename_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        // renaming a file onto a non-empty directory fails on every platform
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        assert!(save_with(&sample(), &path, CompressionMode::None).is_err());
        assert!(!tmp_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn corrupt_payload_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        save_with(&sample(), &path, CompressionMode::None).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        bytes.truncate(bytes.len() - 5);
        fs::write(&path, bytes).unwrap();
        assert!(load(&path).is_err());
    }
}
