// crates/locdb-core/src/model/prefix.rs

//! Sorted-bucket prefix index.
//!
//! The single-word cities sit at the front of the city arena, sorted by folded
//! key. A 26-entry [`LetterTable`] maps each leading letter to its contiguous
//! range in that group; two-letter prefixes are narrowed further by binary
//! search inside the letter's range. Multi-word cities are few and are always
//! scanned linearly.

use super::flat::City;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Arena layout plus the letter table of the single-word group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixIndex {
    pub(crate) single: Range<u32>,
    pub(crate) multi: Range<u32>,
    pub(crate) letters: LetterTable,
}

/// For every letter `a..=z`, the range of sorted positions whose folded key
/// starts with it. Letters without members hold an empty range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterTable {
    ranges: [Range<u32>; 26],
}

impl LetterTable {
    /// Builds the table in one pass over keys that are already sorted.
    pub fn build<'a>(sorted_keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ranges: [Range<u32>; 26] = std::array::from_fn(|_| 0..0);
        let mut seen = [false; 26];
        for (pos, key) in sorted_keys.into_iter().enumerate() {
            let Some(slot) = key.bytes().next().and_then(letter_slot) else {
                continue;
            };
            let pos = pos as u32;
            if seen[slot] {
                ranges[slot].end = pos + 1;
            } else {
                seen[slot] = true;
                ranges[slot] = pos..pos + 1;
            }
        }
        LetterTable { ranges }
    }

    /// Range of `letter` (an ASCII lowercase byte); empty for any other byte
    /// and for letters with no members.
    pub fn bucket(&self, letter: u8) -> Range<u32> {
        letter_slot(letter)
            .map(|slot| self.ranges[slot].clone())
            .unwrap_or(0..0)
    }

    pub(crate) fn ranges(&self) -> &[Range<u32>; 26] {
        &self.ranges
    }
}

fn letter_slot(b: u8) -> Option<usize> {
    b.is_ascii_lowercase().then(|| (b - b'a') as usize)
}

impl PrefixIndex {
    /// `single_len` cities at the start of the arena are the sorted
    /// single-word group, the following `multi_len` the multi-word group.
    pub fn new(sorted_single: &[City], multi_len: usize) -> Self {
        let single_end = sorted_single.len() as u32;
        PrefixIndex {
            single: 0..single_end,
            multi: single_end..single_end + multi_len as u32,
            letters: LetterTable::build(sorted_single.iter().map(|c| c.folded.as_str())),
        }
    }

    pub fn single_range(&self) -> Range<u32> {
        self.single.clone()
    }

    pub fn multi_range(&self) -> Range<u32> {
        self.multi.clone()
    }

    pub fn letters(&self) -> &LetterTable {
        &self.letters
    }

    /// Candidate range of the single-word group for a folded query.
    ///
    /// Only the first word of the query drives narrowing:
    /// - no leading `a..z`: the whole group,
    /// - one character: that letter's bucket,
    /// - two or more: the keys inside the bucket sharing the first two
    ///   characters, located by binary search.
    pub fn narrow(&self, cities: &[City], folded_query: &str) -> Range<u32> {
        let lead = folded_query.split(' ').next().unwrap_or_default();
        let bytes = lead.as_bytes();
        let Some(&first) = bytes.first().filter(|b| b.is_ascii_lowercase()) else {
            return self.single.clone();
        };
        let bucket = self.letters.bucket(first);
        if bytes.len() < 2 || bucket.is_empty() {
            return bucket;
        }
        // Folded keys are ASCII, so byte 2 is a char boundary.
        let prefix = &lead[..2];
        let slice = &cities[bucket.start as usize..bucket.end as usize];
        let lo = slice.partition_point(|c| c.folded.as_str() < prefix);
        let hi = slice.partition_point(|c| c.folded.as_str() < prefix || c.folded.starts_with(prefix));
        bucket.start + lo as u32..bucket.start + hi as u32
    }
}
