// crates/locdb-core/src/loader/common_io.rs
use crate::error::{LocationError, Result};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// Opens a file, buffers it, and wraps it in a Gzip decoder when the name ends
/// in `.gz`. The caller doesn't care about the compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .map_err(|e| LocationError::NotFound(format!("{}: {e}", path.display())))?;
    let reader = BufReader::new(file);

    if is_gzip(path) {
        #[cfg(feature = "compact")]
        return Ok(Box::new(GzDecoder::new(reader)));
        #[cfg(not(feature = "compact"))]
        return Err(LocationError::InvalidData(format!(
            "{} is gzip-compressed but 'compact' is disabled",
            path.display()
        )));
    }
    Ok(Box::new(reader))
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Cache file living next to `source`: `<source file name>.<suffix>`.
pub fn get_cache_path(source: &Path, suffix: &str) -> PathBuf {
    let filename = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "locations".to_owned());
    source.with_file_name(format!("{filename}.{suffix}"))
}

/// True when `cache` exists and is not older than `source`.
pub fn is_cache_fresh(source: &Path, cache: &Path) -> bool {
    let cache_time = match fs::metadata(cache).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(source_time) => source_time <= cache_time,
        // Without a source the cache is all we have.
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_path_sits_next_to_source() {
        let path = get_cache_path(Path::new("/data/locations.json"), "cache.bin");
        assert_eq!(path, PathBuf::from("/data/locations.json.cache.bin"));
    }

    #[test]
    fn missing_cache_is_never_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("locations.json");
        std::fs::write(&source, "{}").unwrap();
        assert!(!is_cache_fresh(&source, &dir.path().join("nope.bin")));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = open_stream(Path::new("/definitely/not/here.json")).err().unwrap();
        assert!(matches!(err, LocationError::NotFound(_)));
    }
}
