//! locdb: command-line interface for locdb-core
//!
//! Usage examples
//! --------------
//!
//! - Show overall stats
//!   $ locdb stats
//!
//! - Search cities; all words must match the city or its country
//!   $ locdb search war poland
//!   $ locdb search łódź
//!
//! - Starts-with lookup, diacritics ignored
//!   $ locdb prefix kra
//!
//! - Pre-build the binary cache
//!   $ locdb --input data/locations.json.gz build
//!
//! - Interactive loop (type `exit()` to leave)
//!   $ locdb repl
//!
//! Data source
//! -----------
//!
//! By default the CLI opens the snapshot bundled with `locdb-core` and keeps a
//! binary cache next to it for fast subsequent runs. `--input` (or
//! `LOCDB_INPUT`) points at another snapshot, `--cache` opens a cache file
//! directly and `--no-cache` always rebuilds.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use locdb_core::loader::{cache, get_cache_path};
use locdb_core::{
    BuildOptions, BuildPolicy, CityContext, LocationDb, LocationIndex, LocationSearch, CACHE_SUFFIX,
};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "Search for city: ";
const EXIT: &str = "exit()";

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let input = args.input.clone().unwrap_or_else(|| {
        LocationDb::default_data_dir().join(LocationDb::default_snapshot_filename())
    });
    let options = BuildOptions {
        policy: if args.skip_invalid {
            BuildPolicy::SkipInvalid
        } else {
            BuildPolicy::FailFast
        },
    };

    if let Commands::Build { output } = &args.command {
        let output = output
            .clone()
            .unwrap_or_else(|| get_cache_path(&input, CACHE_SUFFIX));
        return build_cache(&input, &output, options);
    }

    let db = open_db(&args, &input, options)?;

    match args.command {
        Commands::Stats => {
            let stats = db.stats()?;
            println!("Database statistics:");
            println!("  Countries: {}", stats.countries);
            println!("  Cities: {}", stats.cities);
            println!("    single-word: {}", stats.single_word_cities);
            println!("    multi-word:  {}", stats.multi_word_cities);
        }

        Commands::Countries => {
            if let Some(index) = db.index() {
                for c in index.countries() {
                    println!("{} ({}) - {} cities", c.name(), c.slug(), c.city_ids().len());
                }
            }
        }

        Commands::Search { query } => {
            let query = query.join(" ");
            let hits = db.search(&query)?;
            if hits.is_empty() {
                println!("No cities found matching: {query}");
            }
            print_hits(&hits);
        }

        Commands::Prefix { prefix } => {
            let hits = db.starts_with(&prefix)?;
            if hits.is_empty() {
                println!("No cities start with: {prefix}");
            }
            print_hits(&hits);
        }

        Commands::Repl => repl(&db)?,

        Commands::Build { .. } => unreachable!("handled before opening the database"),
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_db(args: &CliArgs, input: &Path, options: BuildOptions) -> anyhow::Result<LocationDb> {
    let mut db = LocationDb::with_options(options);
    let (opened, source) = match &args.cache {
        Some(cache) => (db.open_from_cache(cache), cache.as_path()),
        None if args.no_cache => (db.open_from_snapshot(input), input),
        None => (db.open(input), input),
    };
    if !opened {
        bail!(
            "could not open the location database from {} (run with -v for details)",
            source.display()
        );
    }
    Ok(db)
}

fn build_cache(input: &Path, output: &Path, options: BuildOptions) -> anyhow::Result<()> {
    let start = Instant::now();
    let index = LocationIndex::from_snapshot_path(input, options)
        .with_context(|| format!("building index from {}", input.display()))?;
    cache::save(&index, output).with_context(|| format!("writing cache {}", output.display()))?;
    info!(elapsed = ?start.elapsed(), "cache build finished");

    let stats = index.stats();
    println!(
        "Wrote {} cities in {} countries to {}",
        stats.cities,
        stats.countries,
        output.display()
    );
    Ok(())
}

fn print_hits(hits: &[CityContext<'_>]) {
    for (city, country) in hits {
        println!(
            "{}, {}\tLat: {}, Lon: {}",
            city.name(),
            country.name(),
            city.lat,
            city.lon
        );
    }
}

fn repl(db: &LocationDb) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim() == EXIT {
            break;
        }

        let start = Instant::now();
        let hits = db.search(&line)?;
        let elapsed = start.elapsed();
        print_hits(&hits);
        println!("Search took: {:.6} seconds\n", elapsed.as_secs_f64());
    }
    Ok(())
}
