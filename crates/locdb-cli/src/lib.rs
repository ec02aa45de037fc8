//! locdb-cli
//! =========
//!
//! Command-line interface for the `locdb-core` place-name index.
//!
//! This crate primarily provides a binary (`locdb`). The library target only
//! carries this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! locdb stats
//! locdb search war poland
//! locdb prefix kra
//! locdb --input my-snapshot.json.gz build
//! locdb repl
//! ```
//!
//! For programmatic access use the `locdb-core` crate directly.
