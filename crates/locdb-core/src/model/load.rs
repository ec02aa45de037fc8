use super::flat::LocationIndex;
use super::prefix::LetterTable;
use crate::error::{LocationError, Result};
use crate::text::{normalize_folded, normalize_loose};
use bincode::Options;
use std::io::{Read, Write};

/// Upper bound for a decoded cache payload, guards against malicious data bombs.
const PAYLOAD_LIMIT: u64 = 256 * 1024 * 1024;

/// Shared bincode configuration; encoding and decoding must agree on it.
pub(crate) fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(PAYLOAD_LIMIT)
}

impl LocationIndex {
    /// Serializes the index (arenas, group ranges and letter table).
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        codec().serialize_into(writer, self)?;
        Ok(())
    }

    /// Reconstructs an index written by [`LocationIndex::write_to`].
    ///
    /// The decoded image is checked against every structural invariant before
    /// it is returned (including a rebuilt letter table and complete
    /// back-links); a corrupt payload yields an error, never a partially
    /// usable index.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let index: LocationIndex = codec().deserialize_from(reader)?;
        index.validate()?;
        Ok(index)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(codec().serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from(data)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(LocationError::InvalidData(msg));
        let total = self.cities.len() as u64;
        let single = &self.prefix.single;
        let multi = &self.prefix.multi;
        if single.start != 0 || single.end != multi.start || multi.end as u64 != total {
            return invalid(format!(
                "group ranges {single:?} / {multi:?} do not cover {total} cities"
            ));
        }
        for (letter, range) in (b'a'..=b'z').zip(self.prefix.letters.ranges()) {
            if range.start > range.end || range.end > single.end {
                return invalid(format!(
                    "letter '{}' range {range:?} outside single-word group",
                    letter as char
                ));
            }
        }

        for (id, country) in self.countries.iter().enumerate() {
            if country.id as usize != id {
                return invalid(format!("country '{}' has id {} at {id}", country.name, country.id));
            }
            if country.loose != normalize_loose(&country.name) || country.folded != normalize_folded(&country.name) {
                return invalid(format!("stale keys for country '{}'", country.name));
            }
            for &c in &country.cities {
                match self.cities.get(c as usize) {
                    Some(city) if city.country_id == country.id => {}
                    _ => return invalid(format!("country '{}' links to bad city {c}", country.name)),
                }
            }
        }

        for (pos, city) in self.cities.iter().enumerate() {
            if city.country_id as usize >= self.countries.len() {
                return invalid(format!("city '{}' has unknown country {}", city.name, city.country_id));
            }
            if !city.lat.is_valid() || !city.lon.is_valid() {
                return invalid(format!("city '{}' has a malformed coordinate", city.name));
            }
            if city.folded != normalize_folded(&city.name) || city.loose != normalize_loose(&city.name) {
                return invalid(format!("stale keys for city '{}'", city.name));
            }
            let in_single = (pos as u32) < single.end;
            if in_single == city.is_multi_word() {
                return invalid(format!("city '{}' is in the wrong group", city.name));
            }
        }

        let sorted = self.cities[..single.end as usize]
            .windows(2)
            .all(|w| w[0].folded <= w[1].folded);
        if !sorted {
            return invalid("single-word group is not sorted".into());
        }

        let letters = LetterTable::build(self.cities[..single.end as usize].iter().map(|c| c.folded.as_str()));
        if letters != self.prefix.letters {
            return invalid("letter table does not match the single-word group".into());
        }

        // Every city is listed exactly once, by its own country.
        let mut linked = vec![false; self.cities.len()];
        for country in &self.countries {
            for &c in &country.cities {
                if std::mem::replace(&mut linked[c as usize], true) {
                    return invalid(format!("city {c} is linked twice"));
                }
            }
        }
        if let Some(pos) = linked.iter().position(|&l| !l) {
            return invalid(format!("city '{}' is missing from its country", self.cities[pos].name));
        }
        Ok(())
    }
}
