// crates/locdb-core/src/model/trie.rs
use super::flat::{City, LocationIndex};
use crate::text::normalize_folded;
use serde::{Deserialize, Serialize};

/// Character trie over folded city names.
///
/// Alternative to the sorted-bucket [`PrefixIndex`](super::prefix::PrefixIndex):
/// it enumerates "starts-with" matches naturally, at the price of one pointer
/// chase per character. Nodes live in a single arena and refer to their
/// children by index; every node keeps a small `(char, child)` table sorted by
/// character.
///
/// Terminal buckets hold city handles. Several cities can share a folded key
/// (two "Springfield"s), so a bucket is a list, never a single slot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CityTrie {
    nodes: Vec<TrieNode>,
    entries: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct TrieNode {
    children: Vec<(char, u32)>,
    bucket: Option<Vec<u32>>,
}

const ROOT: usize = 0;

impl Default for CityTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl CityTrie {
    pub fn new() -> Self {
        CityTrie {
            nodes: vec![TrieNode::default()],
            entries: 0,
        }
    }

    /// Inserts `city` (arena handle `id`) under its folded key.
    ///
    /// Returns `false` and leaves the trie untouched when the key is empty.
    pub fn add(&mut self, id: u32, city: &City) -> bool {
        let key = city.folded.as_str();
        if key.is_empty() {
            return false;
        }
        let mut node = ROOT;
        for ch in key.chars() {
            node = self.child_or_insert(node, ch);
        }
        self.nodes[node].bucket.get_or_insert_with(Vec::new).push(id);
        self.entries += 1;
        true
    }

    /// Exact lookup. `key` is folded first; returns the terminal bucket or an
    /// empty slice.
    pub fn find(&self, key: &str) -> &[u32] {
        let key = normalize_folded(key);
        if key.is_empty() {
            return &[];
        }
        self.walk(&key)
            .and_then(|node| self.nodes[node].bucket.as_deref())
            .unwrap_or(&[])
    }

    /// Starts-with lookup: every city in the subtree below `prefix`.
    /// Order is unspecified.
    pub fn find_any(&self, prefix: &str) -> Vec<u32> {
        let prefix = normalize_folded(prefix);
        let mut out = Vec::new();
        if prefix.is_empty() {
            return out;
        }
        let Some(start) = self.walk(&prefix) else {
            return out;
        };
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            let node = &self.nodes[node];
            if let Some(bucket) = &node.bucket {
                out.extend_from_slice(bucket);
            }
            stack.extend(node.children.iter().map(|&(_, child)| child as usize));
        }
        out
    }

    /// Total entries across all terminal buckets.
    pub fn size(&self) -> usize {
        self.entries
    }

    fn walk(&self, key: &str) -> Option<usize> {
        let mut node = ROOT;
        self.nodes.get(ROOT)?;
        for ch in key.chars() {
            let children = &self.nodes[node].children;
            let pos = children.binary_search_by_key(&ch, |&(c, _)| c).ok()?;
            node = children[pos].1 as usize;
        }
        Some(node)
    }

    fn child_or_insert(&mut self, node: usize, ch: char) -> usize {
        match self.nodes[node]
            .children
            .binary_search_by_key(&ch, |&(c, _)| c)
        {
            Ok(pos) => self.nodes[node].children[pos].1 as usize,
            Err(pos) => {
                let child = self.nodes.len();
                self.nodes.push(TrieNode::default());
                self.nodes[node].children.insert(pos, (ch, child as u32));
                child
            }
        }
    }
}

impl LocationIndex {
    /// Builds a [`CityTrie`] over every city of the index.
    pub fn trie(&self) -> CityTrie {
        let mut trie = CityTrie::new();
        for (id, city) in self.cities.iter().enumerate() {
            trie.add(id as u32, city);
        }
        trie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::flat::Dms;

    fn city(name: &str) -> City {
        City::new(0, name, Dms::new(vec![0.0]).unwrap(), Dms::new(vec![0.0]).unwrap())
    }

    fn sorted(mut ids: Vec<u32>) -> Vec<u32> {
        ids.sort_unstable();
        ids
    }

    #[test]
    fn add_rejects_empty_keys() {
        let mut trie = CityTrie::new();
        assert!(!trie.add(0, &city("北京")));
        assert!(trie.add(1, &city("Kraków")));
        assert_eq!(trie.size(), 1);
    }

    #[test]
    fn find_is_exact_and_folds_the_key() {
        let mut trie = CityTrie::new();
        trie.add(0, &city("Kraków"));
        trie.add(1, &city("Krakowiec"));
        assert_eq!(trie.find("KRAKÓW"), &[0]);
        assert_eq!(trie.find("krakow"), &[0]);
        assert!(trie.find("krak").is_empty());
        assert!(trie.find("krakowska").is_empty());
        assert!(trie.find("").is_empty());
    }

    #[test]
    fn buckets_accumulate_collisions() {
        let mut trie = CityTrie::new();
        trie.add(3, &city("Springfield"));
        trie.add(7, &city("Springfield"));
        assert_eq!(trie.find("springfield"), &[3, 7]);
        assert_eq!(trie.size(), 2);
    }

    #[test]
    fn find_any_collects_the_subtree() {
        let mut trie = CityTrie::new();
        for (id, name) in ["Warsaw", "Warka", "Wrocław", "Łódź", "War"].iter().enumerate() {
            trie.add(id as u32, &city(name));
        }
        assert_eq!(sorted(trie.find_any("war")), vec![0, 1, 4]);
        assert_eq!(sorted(trie.find_any("W")), vec![0, 1, 2, 4]);
        assert_eq!(trie.find_any("łó"), vec![3]);
        assert!(trie.find_any("x").is_empty());
        assert!(trie.find_any("").is_empty());
        assert_eq!(trie.size(), 5);
    }
}
