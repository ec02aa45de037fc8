//! Basic usage example for locdb-rs
//!
//! Opens the bundled snapshot (with the binary cache next to it) and runs a
//! few searches.

use locdb_core::{LocationDb, LocationError, LocationSearch, Result};

fn main() -> Result<()> {
    println!("=== locdb-rs Basic Usage Example ===\n");

    let mut db = LocationDb::new();
    let snapshot = LocationDb::default_data_dir().join(LocationDb::default_snapshot_filename());
    if !db.open(&snapshot) {
        return Err(LocationError::NotOpened);
    }

    let stats = db.stats()?;
    println!(
        "Loaded {} countries, {} cities ({} multi-word)\n",
        stats.countries, stats.cities, stats.multi_word_cities
    );

    // Example 1: diacritics are optional in queries
    println!("--- Example 1: 'lodz' ---");
    for (city, country) in db.search("lodz")? {
        println!("  {}, {}  ({:.4}, {:.4})", city.name(), country.name(), city.latitude(), city.longitude());
    }
    println!();

    // Example 2: every word has to match the city or its country
    println!("--- Example 2: 'war poland' ---");
    for (city, country) in db.search("war poland")? {
        println!("  {}, {}", city.name(), country.name());
    }
    println!();

    // Example 3: same name, different countries
    println!("--- Example 3: 'springfield' ---");
    for (city, country) in db.search("springfield")? {
        println!("  {}, {}  lat {} lon {}", city.name(), country.name(), city.lat, city.lon);
    }
    println!();

    // Example 4: starts-with lookup through the trie
    println!("--- Example 4: cities starting with 'bra' ---");
    for (city, country) in db.starts_with("bra")? {
        println!("  {}, {}", city.name(), country.name());
    }
    println!();

    // Example 5: countries with their city counts
    println!("--- Example 5: countries ---");
    if let Some(index) = db.index() {
        for country in index.countries() {
            println!("  {} [{}] - {} cities", country.name(), country.slug(), country.city_ids().len());
        }
    }

    Ok(())
}
