//! Error handling example for locdb-rs
//!
//! Shows how failures surface: `bool` from the open methods, `NotOpened` from
//! queries on an unopened database, typed errors from the lower-level API.

use locdb_core::loader::cache;
use locdb_core::{
    BuildOptions, BuildPolicy, IndexBuilder, LocationDb, LocationError, LocationIndex, LocationSearch, Result,
};

fn main() -> Result<()> {
    println!("=== locdb-rs Error Handling Example ===\n");

    // Example 1: querying before opening
    println!("--- Example 1: search before open ---");
    let mut db = LocationDb::new();
    match db.search("warsaw") {
        Ok(hits) => println!("  unexpected: {} hits", hits.len()),
        Err(LocationError::NotOpened) => println!("  ✓ NotOpened, as expected"),
        Err(e) => return Err(e),
    }
    println!();

    // Example 2: a failed open reports false and leaves the database unopened
    println!("--- Example 2: opening a missing cache ---");
    let opened = db.open_from_cache("/no/such/locations.cache.bin");
    println!("  opened: {opened}, is_opened: {}", db.is_opened());
    println!();

    // Example 3: typed errors from the lower-level API
    println!("--- Example 3: malformed snapshots ---");
    let snapshots = [
        r#"{"Poland": {"keys": ["name","lat"], "data": []}}"#,
        r#"{"Poland": {"keys": ["name","lat","lon"], "data": ["Warsaw", [52,13]]}}"#,
        r#"{"Poland": {"keys": ["name","lat","lon"], "data": ["Warsaw", [1,2,3,4], [21]]}}"#,
        r#"{"Poland": "#,
    ];
    for json in snapshots {
        match LocationIndex::from_snapshot_str(json, BuildOptions::default()) {
            Ok(_) => println!("  ✗ accepted: {json}"),
            Err(e) => println!("  ✓ {e}"),
        }
    }
    println!();

    // Example 4: skipping bad records instead of failing
    println!("--- Example 4: SkipInvalid ---");
    let json = r#"{"Poland": {"keys": ["name","lat","lon"],
                   "data": ["Warsaw", [52,13], [21,0], "Kraków", "?", [19,56]]}}"#;
    let mut builder = IndexBuilder::new(BuildOptions {
        policy: BuildPolicy::SkipInvalid,
    });
    builder.read_json_str(json)?;
    println!("  skipped {} record(s)", builder.skipped());
    let index = builder.build()?;
    println!();

    // Example 5: a cache that is not a cache
    println!("--- Example 5: loading a foreign file as cache ---");
    let path = std::env::temp_dir().join("locdb-demo-not-a-cache.bin");
    std::fs::write(&path, b"hello")?;
    match cache::load(&path) {
        Ok(_) => println!("  ✗ accepted"),
        Err(e) => println!("  ✓ {e}"),
    }
    cache::save(&index, &path)?;
    println!("  after save: {} cities", cache::load(&path)?.cities().count());
    std::fs::remove_file(&path)?;

    Ok(())
}
