// crates/locdb-core/src/model/search.rs
use super::flat::{City, Country, LocationIndex};
use crate::common::DbStats;
use crate::text::{normalize_folded, normalize_loose};
use crate::traits::{CitiesIter, CityContext, LocationSearch, NameKeys};

/// A normalized query, routed to either loose or folded city keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Folded form of the whole query.
    pub folded: String,
    /// Folded form of the first query word alone; drives narrowing of the
    /// sorted group. Empty when that word has no ASCII folding (CJK, most
    /// Cyrillic), which means the whole group is scanned.
    pub lead: String,
    /// Tokens compared against city keys (and country loose keys).
    pub tokens: Vec<String>,
    /// True when the query carries diacritics and is matched accent-sensitively.
    pub accent_sensitive: bool,
}

impl QueryPlan {
    /// Returns `None` for empty queries and for queries whose first character
    /// is not alphabetic.
    pub fn new(query: &str) -> Option<Self> {
        let query = query.trim();
        if !query.chars().next().is_some_and(char::is_alphabetic) {
            return None;
        }
        let loose = normalize_loose(query);
        let folded = normalize_folded(query);
        let accent_sensitive = folded != loose;
        let routed = if accent_sensitive { &loose } else { &folded };
        let tokens = routed.split(' ').map(str::to_owned).collect();
        let lead = normalize_folded(loose.split(' ').next().unwrap_or_default());
        Some(QueryPlan {
            folded,
            lead,
            tokens,
            accent_sensitive,
        })
    }

    /// Every token must occur in the city key or the country's loose key.
    pub fn matches(&self, city: &City, country: &Country) -> bool {
        let key = if self.accent_sensitive {
            city.loose_key()
        } else {
            city.folded_key()
        };
        self.tokens
            .iter()
            .all(|t| key.contains(t.as_str()) || country.loose_key().contains(t.as_str()))
    }
}

impl LocationSearch for LocationIndex {
    fn stats(&self) -> DbStats {
        DbStats {
            countries: self.countries.len(),
            cities: self.cities.len(),
            single_word_cities: self.prefix.single.len(),
            multi_word_cities: self.prefix.multi.len(),
        }
    }

    fn countries(&self) -> &[Country] {
        &self.countries
    }

    fn cities<'a>(&'a self) -> CitiesIter<'a> {
        Box::new(self.cities.iter().map(move |c| (c, self.country_of(c))))
    }

    fn find_country(&self, name_or_slug: &str) -> Option<&Country> {
        let q = name_or_slug.trim();
        self.countries
            .iter()
            .find(|c| c.slug.eq_ignore_ascii_case(q))
            .or_else(|| self.countries.iter().find(|c| c.is_named(q)))
    }

    fn search(&self, query: &str) -> Vec<CityContext<'_>> {
        let Some(plan) = QueryPlan::new(query) else {
            return Vec::new();
        };
        let narrowed = self.prefix.narrow(&self.cities, &plan.lead);
        let single = &self.cities[narrowed.start as usize..narrowed.end as usize];
        let multi = &self.cities[self.prefix.multi.start as usize..self.prefix.multi.end as usize];

        single
            .iter()
            .chain(multi)
            .filter_map(|city| {
                let country = self.country_of(city);
                plan.matches(city, country).then_some((city, country))
            })
            .collect()
    }
}

impl LocationIndex {
    /// Starts-with lookup on folded names through a throwaway [`CityTrie`].
    ///
    /// [`LocationDb::starts_with`](crate::LocationDb::starts_with) keeps the
    /// trie around between calls.
    ///
    /// [`CityTrie`]: super::trie::CityTrie
    pub fn starts_with(&self, prefix: &str) -> Vec<CityContext<'_>> {
        self.resolve(&self.trie().find_any(prefix))
    }

    /// Resolves city handles to `(city, country)` pairs, skipping unknown ids.
    pub fn resolve(&self, ids: &[u32]) -> Vec<CityContext<'_>> {
        ids.iter()
            .filter_map(|&id| self.city(id))
            .map(|c| (c, self.country_of(c)))
            .collect()
    }
}
