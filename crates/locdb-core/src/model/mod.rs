// crates/locdb-core/src/model/mod.rs
pub mod convert;
pub mod flat;
pub mod load;
pub mod prefix;
pub mod search;
pub mod trie;

pub use convert::{BuildOptions, BuildPolicy, CityRecord, IndexBuilder};
pub use flat::{City, Country, Dms, LocationIndex};
pub use prefix::{LetterTable, PrefixIndex};
pub use search::QueryPlan;
pub use trie::CityTrie;

#[cfg(not(feature = "compact"))]
pub const CACHE_SUFFIX: &str = "cache.bin";
#[cfg(feature = "compact")]
pub const CACHE_SUFFIX: &str = "cache.bin.gz";
