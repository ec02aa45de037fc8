// crates/locdb-core/src/model/convert.rs
use super::flat::{City, Country, Dms, LocationIndex};
use super::prefix::PrefixIndex;
use crate::error::{LocationError, Result};
use std::collections::HashSet;
use tracing::{info, warn};

/// What to do with a record that cannot be turned into a city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildPolicy {
    /// Abort the whole build on the first malformed record.
    #[default]
    FailFast,
    /// Log and count malformed records, keep building.
    ///
    /// Structural errors (broken `keys` list, data length not a multiple of
    /// the key count) still abort.
    SkipInvalid,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub policy: BuildPolicy,
}

/// One decoded source record, before keys are derived.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub name: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

/// Collects countries and cities, then freezes them into a [`LocationIndex`].
///
/// Nothing is visible to readers until [`IndexBuilder::build`] returns, so a
/// failed build never exposes a partial index.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    options: BuildOptions,
    countries: Vec<String>,
    cities: Vec<City>,
    seen: HashSet<String>,
    skipped: usize,
}

impl IndexBuilder {
    pub fn new(options: BuildOptions) -> Self {
        IndexBuilder {
            options,
            ..Self::default()
        }
    }

    /// Registers a country and returns its provisional handle.
    pub fn add_country(&mut self, name: &str) -> Result<u16> {
        if name.trim().is_empty() {
            return Err(LocationError::data_format(name, "blank country name"));
        }
        if !self.seen.insert(name.to_owned()) {
            return Err(LocationError::data_format(name, "duplicate country"));
        }
        let id = u16::try_from(self.countries.len())
            .map_err(|_| LocationError::data_format(name, "too many countries"))?;
        self.countries.push(name.to_owned());
        Ok(id)
    }

    /// Adds the `index`-th record of `country`. Invalid records are rejected
    /// according to the build policy.
    pub fn add_city(&mut self, country: u16, index: usize, record: CityRecord) -> Result<()> {
        if record.name.trim().is_empty() {
            return self.reject(country, index, "blank city name".into());
        }
        let Some(lat) = Dms::new(record.lat) else {
            return self.reject(country, index, "'lat' must have 1 to 3 finite components".into());
        };
        let Some(lon) = Dms::new(record.lon) else {
            return self.reject(country, index, "'lon' must have 1 to 3 finite components".into());
        };
        self.cities.push(City::new(country, record.name, lat, lon));
        Ok(())
    }

    /// Applies the build policy to a record that failed to decode.
    pub(crate) fn reject(&mut self, country: u16, index: usize, reason: String) -> Result<()> {
        let country = self
            .countries
            .get(country as usize)
            .map(String::as_str)
            .unwrap_or_default();
        match self.options.policy {
            BuildPolicy::FailFast => Err(LocationError::data_format(
                country,
                format!("record {index}: {reason}"),
            )),
            BuildPolicy::SkipInvalid => {
                warn!(country, record = index, %reason, "skipping malformed record");
                self.skipped += 1;
                Ok(())
            }
        }
    }

    /// Number of records dropped under [`BuildPolicy::SkipInvalid`].
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Freezes the collected data.
    ///
    /// Countries are re-ordered by display name; single-word cities are sorted
    /// by folded key and placed in front of the multi-word ones.
    pub fn build(self) -> Result<LocationIndex> {
        let IndexBuilder {
            countries: names,
            cities,
            skipped,
            ..
        } = self;

        // Provisional handle -> final handle (alphabetical order).
        let mut order: Vec<u16> = (0..names.len() as u16).collect();
        order.sort_by(|&a, &b| names[a as usize].cmp(&names[b as usize]));
        let mut remap = vec![0u16; names.len()];
        for (final_id, &provisional) in order.iter().enumerate() {
            remap[provisional as usize] = final_id as u16;
        }
        let mut countries: Vec<Country> = order
            .iter()
            .enumerate()
            .map(|(id, &p)| Country::new(id as u16, names[p as usize].as_str()))
            .collect();

        let (mut single, multi): (Vec<City>, Vec<City>) = cities
            .into_iter()
            .map(|mut city| {
                city.country_id = remap[city.country_id as usize];
                city
            })
            .partition(|city| !city.is_multi_word());

        single.sort_by(|a, b| {
            a.folded
                .cmp(&b.folded)
                .then_with(|| a.loose.cmp(&b.loose))
                .then_with(|| a.country_id.cmp(&b.country_id))
        });

        if single.len() + multi.len() > u32::MAX as usize {
            return Err(LocationError::InvalidData("too many cities".into()));
        }

        let prefix = PrefixIndex::new(&single, multi.len());
        let mut cities = single;
        cities.extend(multi);

        for (id, city) in cities.iter().enumerate() {
            countries[city.country_id as usize].cities.push(id as u32);
        }

        info!(
            countries = countries.len(),
            cities = cities.len(),
            single_word = prefix.single.len(),
            skipped,
            "built location index"
        );

        Ok(LocationIndex {
            countries,
            cities,
            prefix,
        })
    }
}
