//! End-to-end tests for `LocationDb`: opening the bundled snapshot, caching,
//! and querying from several threads.

use std::fs;
use std::path::{Path, PathBuf};

use locdb_core::loader::get_cache_path;
use locdb_core::{LocationDb, LocationError, CACHE_SUFFIX};
use tempfile::TempDir;

const QUERIES: &[&str] = &[
    "springfield",
    "war poland",
    "war germany",
    "krakow",
    "kraków",
    "łódź",
    "lodz",
    "new",
    "united",
    "sao",
    "são paulo",
    "köln",
    "koln",
    "reykjavik",
    "b",
    "frankfurt main",
    "homburg",
    "",
    "123abc",
];

fn bundled_snapshot() -> PathBuf {
    LocationDb::default_data_dir().join(LocationDb::default_snapshot_filename())
}

/// Copies the bundled snapshot into a scratch directory so caches are written there.
fn scratch_snapshot() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locations.json");
    fs::copy(bundled_snapshot(), &path).unwrap();
    (dir, path)
}

fn names(db: &LocationDb, query: &str) -> Vec<String> {
    let mut out: Vec<String> = db
        .search(query)
        .unwrap()
        .into_iter()
        .map(|(city, country)| format!("{}, {}", city.name(), country.name()))
        .collect();
    out.sort();
    out
}

fn opened_from_snapshot(path: &Path) -> LocationDb {
    let mut db = LocationDb::new();
    assert!(db.open_from_snapshot(path));
    db
}

#[test]
fn bundled_snapshot_opens() {
    let db = opened_from_snapshot(&bundled_snapshot());
    let stats = db.stats().unwrap();
    assert_eq!(stats.countries, 7);
    assert_eq!(stats.cities, 32);
    assert_eq!(stats.single_word_cities, 23);
    assert_eq!(stats.multi_word_cities, 9);
}

#[test]
fn representative_queries() {
    let db = opened_from_snapshot(&bundled_snapshot());
    assert_eq!(
        names(&db, "springfield"),
        ["Springfield, United Kingdom", "Springfield, United States"]
    );
    assert_eq!(names(&db, "war poland"), ["Warka, Poland", "Warsaw, Poland"]);
    assert_eq!(names(&db, "war germany"), ["Wartenberg, Germany"]);
    assert_eq!(names(&db, "koln"), ["Köln, Germany"]);
    assert_eq!(names(&db, "são"), ["São Paulo, Brazil"]);
    assert_eq!(names(&db, "new"), ["New York, United States"]);
    assert_eq!(
        names(&db, "united"),
        [
            "Milton Keynes, United Kingdom",
            "New York, United States",
            "San José, United States"
        ]
    );
    assert!(names(&db, "").is_empty());
    assert!(names(&db, "123abc").is_empty());
}

#[test]
fn southern_and_western_hemispheres() {
    let db = opened_from_snapshot(&bundled_snapshot());
    let hits = db.search("reykjavik").unwrap();
    let (city, _) = hits[0];
    assert!((city.latitude() - (64.0 + 8.0 / 60.0 + 48.0 / 3600.0)).abs() < 1e-9);
    assert!((city.longitude() + (21.0 + 56.0 / 60.0 + 24.0 / 3600.0)).abs() < 1e-9);

    let hits = db.search("sao paulo").unwrap();
    assert!(hits[0].0.latitude() < -23.0);
}

#[test]
fn cache_round_trip_preserves_results() {
    let (dir, snapshot) = scratch_snapshot();
    let built = opened_from_snapshot(&snapshot);
    let cache = dir.path().join("index.bin");
    assert!(built.save_to_cache(&cache));

    let mut cached = LocationDb::new();
    assert!(cached.open_from_cache(&cache));
    assert_eq!(cached.stats().unwrap(), built.stats().unwrap());
    for query in QUERIES {
        assert_eq!(names(&cached, query), names(&built, query), "query {query:?}");
    }
}

#[test]
fn smart_open_writes_and_reuses_the_cache() {
    let (_dir, snapshot) = scratch_snapshot();
    let cache = get_cache_path(&snapshot, CACHE_SUFFIX);

    let mut db = LocationDb::new();
    assert!(db.open(&snapshot));
    assert!(cache.exists());
    let expected = names(&db, "springfield");

    // With the snapshot gone the only way to open is the cache.
    fs::remove_file(&snapshot).unwrap();
    let mut reopened = LocationDb::new();
    assert!(reopened.open(&snapshot));
    assert_eq!(names(&reopened, "springfield"), expected);
}

#[test]
fn smart_open_rebuilds_over_a_broken_cache() {
    let (_dir, snapshot) = scratch_snapshot();
    let cache = get_cache_path(&snapshot, CACHE_SUFFIX);
    fs::write(&cache, b"definitely not a cache").unwrap();

    let mut db = LocationDb::new();
    assert!(db.open(&snapshot));
    assert_eq!(db.stats().unwrap().cities, 32);

    let mut from_cache = LocationDb::new();
    assert!(from_cache.open_from_cache(&cache));
}

#[test]
fn queries_before_open_are_errors() {
    let db = LocationDb::new();
    assert!(matches!(db.search("warsaw"), Err(LocationError::NotOpened)));
}

#[test]
fn failed_open_leaves_database_unopened() {
    let (dir, snapshot) = scratch_snapshot();
    let mut db = opened_from_snapshot(&snapshot);

    let broken = dir.path().join("broken.json");
    fs::write(&broken, r#"{"Poland": {"keys": ["name","lat"], "data": []}}"#).unwrap();
    assert!(!db.open_from_snapshot(&broken));
    assert!(!db.is_opened());
    assert!(matches!(db.search("warsaw"), Err(LocationError::NotOpened)));

    assert!(!db.open_from_cache(dir.path().join("missing.bin")));
    assert!(!db.is_opened());
}

#[test]
fn concurrent_searches_agree() {
    let db = opened_from_snapshot(&bundled_snapshot());
    let expected: Vec<Vec<String>> = QUERIES.iter().map(|q| names(&db, q)).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| QUERIES.iter().map(|q| names(&db, q)).collect::<Vec<_>>()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn starts_with_covers_both_groups() {
    let db = opened_from_snapshot(&bundled_snapshot());
    let mut hits: Vec<&str> = db
        .starts_with("san")
        .unwrap()
        .into_iter()
        .map(|(city, _)| city.name())
        .collect();
    hits.sort();
    assert_eq!(hits, ["San José"]);
    assert_eq!(db.starts_with("sao").unwrap().len(), 1);
}
