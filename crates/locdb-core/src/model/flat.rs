// crates/locdb-core/src/model/flat.rs
use super::prefix::PrefixIndex;
use crate::text::{normalize_folded, normalize_loose};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The master index struct.
///
/// Countries and cities live in two flat arenas; cross references are plain
/// integer handles into them. The city arena holds the single-word group
/// (sorted by folded key) followed by the multi-word group, both described by
/// [`PrefixIndex`].
///
/// A `LocationIndex` is immutable once built, so it can be shared between
/// threads and queried concurrently without locking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationIndex {
    /// Master list of all countries, ordered by display name. `countries[i].id == i`.
    pub(crate) countries: Vec<Country>,
    /// Master list of all cities. Contiguous memory.
    pub(crate) cities: Vec<City>,
    pub(crate) prefix: PrefixIndex,
}

/// A Country entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Country {
    pub id: u16,
    /// ASCII slug derived from the folded name, e.g. `"cote_divoire"`.
    pub slug: String,
    pub name: String,
    pub(crate) loose: String,
    pub(crate) folded: String,
    /// Handles of the cities of this country in the city arena.
    pub(crate) cities: Vec<u32>,
}

/// A City entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct City {
    pub country_id: u16,
    pub name: String,
    pub lat: Dms,
    pub lon: Dms,
    pub(crate) loose: String,
    pub(crate) folded: String,
}

/// Degree/minute/second coordinate: 1 to 3 components, the sign of the first
/// one encoding the hemisphere (negative = S / W).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    components: Vec<f64>,
}

impl Dms {
    pub const MAX_COMPONENTS: usize = 3;

    /// Returns `None` unless there are 1..=3 finite components.
    pub fn new(components: impl Into<Vec<f64>>) -> Option<Self> {
        let components = components.into();
        let valid = (1..=Self::MAX_COMPONENTS).contains(&components.len())
            && components.iter().all(|c| c.is_finite());
        valid.then_some(Dms { components })
    }

    pub fn components(&self) -> &[f64] {
        &self.components
    }

    /// Decimal degrees: `Σ |c[i]| / 60^i`, signed by the first component.
    ///
    /// ```rust
    /// use locdb_core::Dms;
    ///
    /// let lat = Dms::new(vec![-52.0, 13.0]).unwrap();
    /// assert!((lat.to_decimal() + 52.2167).abs() < 1e-4);
    /// ```
    pub fn to_decimal(&self) -> f64 {
        let first = self.components[0];
        let mut scale = 1.0;
        let mut magnitude = first.abs();
        for c in &self.components[1..] {
            scale *= 60.0;
            magnitude += c.abs() / scale;
        }
        if first.is_sign_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        (1..=Self::MAX_COMPONENTS).contains(&self.components.len())
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MARKS: [char; 3] = ['°', '′', '″'];
        for (c, mark) in self.components.iter().zip(MARKS) {
            write!(f, "{c}{mark}")?;
        }
        Ok(())
    }
}

impl City {
    /// Creates a city and caches its comparison keys.
    pub fn new(country_id: u16, name: impl Into<String>, lat: Dms, lon: Dms) -> Self {
        let name = name.into();
        City {
            country_id,
            loose: normalize_loose(&name),
            folded: normalize_folded(&name),
            name,
            lat,
            lon,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.lat.to_decimal()
    }

    pub fn longitude(&self) -> f64 {
        self.lon.to_decimal()
    }

    /// True when the name has more than one whitespace-separated word.
    pub fn is_multi_word(&self) -> bool {
        self.name.split_whitespace().nth(1).is_some()
    }
}

impl Country {
    pub(crate) fn new(id: u16, name: impl Into<String>) -> Self {
        let name = name.into();
        Country {
            id,
            slug: crate::text::country_slug(&name),
            loose: normalize_loose(&name),
            folded: normalize_folded(&name),
            name,
            cities: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Handles of this country's cities; resolve them with
    /// [`LocationIndex::city`].
    pub fn city_ids(&self) -> &[u32] {
        &self.cities
    }
}

impl LocationIndex {
    /// City by arena handle.
    pub fn city(&self, id: u32) -> Option<&City> {
        self.cities.get(id as usize)
    }

    /// Country by arena handle.
    pub fn country(&self, id: u16) -> Option<&Country> {
        self.countries.get(id as usize)
    }

    /// Country owning `city`. Handles are validated at build/load time.
    pub fn country_of(&self, city: &City) -> &Country {
        &self.countries[city.country_id as usize]
    }

    pub fn prefix_index(&self) -> &PrefixIndex {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dms(c: &[f64]) -> Dms {
        Dms::new(c.to_vec()).unwrap()
    }

    #[test]
    fn decimal_conversion() {
        assert!((dms(&[52.0, 13.0, 0.0]).to_decimal() - 52.2167).abs() < 1e-4);
        assert!((dms(&[-52.0, 13.0]).to_decimal() + 52.2167).abs() < 1e-4);
        assert!((dms(&[21.0, 0.0, 36.0]).to_decimal() - 21.01).abs() < 1e-9);
        assert_eq!(dms(&[17.0]).to_decimal(), 17.0);
    }

    #[test]
    fn negative_zero_degrees_keeps_hemisphere() {
        assert!((dms(&[-0.0, 30.0]).to_decimal() + 0.5).abs() < 1e-9);
    }

    #[test]
    fn component_count_is_bounded() {
        assert!(Dms::new(Vec::new()).is_none());
        assert!(Dms::new(vec![1.0, 2.0, 3.0, 4.0]).is_none());
        assert!(Dms::new(vec![f64::NAN]).is_none());
        assert!(Dms::new(vec![1.0, 2.0, 3.0]).is_some());
    }

    #[test]
    fn dms_display() {
        assert_eq!(dms(&[52.0, 13.0, 0.0]).to_string(), "52°13′0″");
        assert_eq!(dms(&[-21.0]).to_string(), "-21°");
    }

    #[test]
    fn city_caches_both_keys() {
        let city = City::new(0, "Zielona  Góra", dms(&[51.0]), dms(&[15.0]));
        assert_eq!(city.loose, "zielona góra");
        assert_eq!(city.folded, "zielona gora");
        assert!(city.is_multi_word());
        assert!(!City::new(0, "Łódź", dms(&[51.0]), dms(&[19.0])).is_multi_word());
    }
}
