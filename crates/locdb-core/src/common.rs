use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for a location index.
///
/// Returned by [`LocationSearch::stats`](crate::traits::LocationSearch::stats),
/// these counts reflect the materialized in-memory index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub countries: usize,
    pub cities: usize,
    /// Cities whose name is a single word (the sorted, letter-bucketed group).
    pub single_word_cities: usize,
    /// Cities whose name has several words (the linearly scanned group).
    pub multi_word_cities: usize,
}
