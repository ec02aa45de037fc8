// crates/locdb-core/src/traits.rs
use crate::common::DbStats;
use crate::model::{City, Country};
use crate::text::normalize_folded;

/// Name-based matching helpers for types that carry cached comparison keys.
///
/// Implementors expose their display name together with its loose and folded
/// keys (see [`crate::text`]) and get accent-insensitive helpers for free.
///
/// # Examples
/// ```rust
/// use locdb_core::traits::NameKeys;
/// use locdb_core::{City, Dms};
///
/// let city = City::new(0, "Łódź", Dms::new(vec![51.0, 46.0]).unwrap(), Dms::new(vec![19.0, 27.0]).unwrap());
/// assert!(city.is_named("lodz"));
/// assert!(city.name_contains("ODZ"));
/// ```
pub trait NameKeys {
    /// Returns the display name.
    fn name_str(&self) -> &str;

    /// Lowercased, whitespace-collapsed name with diacritics.
    fn loose_key(&self) -> &str;

    /// Lowercased ASCII name without diacritics.
    fn folded_key(&self) -> &str;

    /// Accent-insensitive and case-insensitive name comparison.
    #[inline]
    fn is_named(&self, q: &str) -> bool {
        self.folded_key() == normalize_folded(q)
    }

    /// Accent-insensitive + case-insensitive substring match.
    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        self.folded_key().contains(&normalize_folded(q))
    }
}

/// A city together with its owning country.
pub type CityContext<'a> = (&'a City, &'a Country);

/// An iterator that yields cities with their country.
pub type CitiesIter<'a> = Box<dyn Iterator<Item = CityContext<'a>> + 'a>;

/// Read-only query surface of a built index.
pub trait LocationSearch {
    fn stats(&self) -> DbStats;

    /// All countries, ordered by display name.
    fn countries(&self) -> &[Country];

    /// Every city with its country, single-word group first.
    fn cities<'a>(&'a self) -> CitiesIter<'a>;

    /// Finds a country by slug (`"united_kingdom"`) or, failing that, by
    /// accent-insensitive name.
    fn find_country(&self, name_or_slug: &str) -> Option<&Country>;

    /// Diacritic-tolerant prefix/substring search.
    ///
    /// Every whitespace-separated token of `query` must occur in the city name
    /// or in the country name. The result is a set: each city at most once, in
    /// no particular order. Empty queries and queries that do not start with a
    /// letter yield no results.
    fn search(&self, query: &str) -> Vec<CityContext<'_>>;
}

impl NameKeys for City {
    #[inline]
    fn name_str(&self) -> &str {
        &self.name
    }

    #[inline]
    fn loose_key(&self) -> &str {
        &self.loose
    }

    #[inline]
    fn folded_key(&self) -> &str {
        &self.folded
    }
}

impl NameKeys for Country {
    #[inline]
    fn name_str(&self) -> &str {
        &self.name
    }

    #[inline]
    fn loose_key(&self) -> &str {
        &self.loose
    }

    #[inline]
    fn folded_key(&self) -> &str {
        &self.folded
    }
}
