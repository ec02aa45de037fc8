// crates/locdb-core/src/raw.rs

//! Decoding of the keys/data source snapshot.
//!
//! NOTE: this mirrors the layout produced by the external crawler. Values are
//! kept dynamic only until they are checked against the field list and turned
//! into a typed [`CityRecord`]; nothing past this module sees a
//! `serde_json::Value`.
//!
//! Two layouts are accepted:
//!
//! ```text
//! { "<country>": { "keys": ["name","lat","lon"], "data": [...] }, ... }
//! { "keys": ["name","lat","lon"], "data": { "<country>": [...] , ... } }
//! ```
//!
//! The second one (a single shared field list) is what older snapshots look like.

use crate::error::{LocationError, Result};
use crate::model::convert::{CityRecord, IndexBuilder};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const NAME: &str = "name";
pub const LAT: &str = "lat";
pub const LON: &str = "lon";
pub const KEYS: &str = "keys";
pub const DATA: &str = "data";

/// Raw per-country entry as it comes from JSON.
#[derive(Debug, Deserialize)]
pub struct CountryRaw {
    pub keys: Vec<String>,
    pub data: Vec<Value>,
}

/// Positions of the known fields inside one cyclic chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    width: usize,
    name: usize,
    lat: usize,
    lon: usize,
}

impl FieldLayout {
    /// Validates a `keys` list: non-empty, no duplicates, no unknown keys and
    /// all of `name`, `lat`, `lon` present.
    pub fn from_keys(keys: &[String]) -> std::result::Result<Self, String> {
        if keys.is_empty() {
            return Err("'keys' is empty".into());
        }
        let (mut name, mut lat, mut lon) = (None, None, None);
        for (pos, key) in keys.iter().enumerate() {
            let slot = match key.as_str() {
                NAME => &mut name,
                LAT => &mut lat,
                LON => &mut lon,
                other => return Err(format!("unknown key '{other}'")),
            };
            if slot.replace(pos).is_some() {
                return Err(format!("duplicate key '{key}'"));
            }
        }
        let missing = |field: &str| format!("missing key '{field}'");
        Ok(FieldLayout {
            width: keys.len(),
            name: name.ok_or_else(|| missing(NAME))?,
            lat: lat.ok_or_else(|| missing(LAT))?,
            lon: lon.ok_or_else(|| missing(LON))?,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Decodes one chunk of exactly `width` values.
    pub fn decode(&self, chunk: &[Value]) -> std::result::Result<CityRecord, String> {
        let name = chunk[self.name]
            .as_str()
            .ok_or_else(|| format!("'{NAME}' must be a string, got {}", chunk[self.name]))?;
        Ok(CityRecord {
            name: name.to_owned(),
            lat: decode_coordinate(LAT, &chunk[self.lat])?,
            lon: decode_coordinate(LON, &chunk[self.lon])?,
        })
    }
}

fn decode_coordinate(field: &str, value: &Value) -> std::result::Result<Vec<f64>, String> {
    let parts = value
        .as_array()
        .ok_or_else(|| format!("'{field}' must be an array, got {value}"))?;
    if parts.is_empty() || parts.len() > 3 {
        return Err(format!("'{field}' must have 1 to 3 components, got {}", parts.len()));
    }
    parts
        .iter()
        .map(|p| {
            p.as_f64()
                .ok_or_else(|| format!("'{field}' component {p} is not a number"))
        })
        .collect()
}

/// Feeds one country's cyclic data into the builder.
pub fn decode_country(builder: &mut IndexBuilder, name: &str, keys: &[String], data: &[Value]) -> Result<()> {
    let layout = FieldLayout::from_keys(keys).map_err(|reason| LocationError::data_format(name, reason))?;
    if data.len() % layout.width() != 0 {
        return Err(LocationError::data_format(
            name,
            format!(
                "'data' has {} values, not a multiple of {} keys",
                data.len(),
                layout.width()
            ),
        ));
    }
    let country = builder.add_country(name)?;
    for (index, chunk) in data.chunks_exact(layout.width()).enumerate() {
        match layout.decode(chunk) {
            Ok(record) => builder.add_city(country, index, record)?,
            Err(reason) => builder.reject(country, index, reason)?,
        }
    }
    Ok(())
}

/// Feeds a whole parsed snapshot into the builder, in country-name order.
pub fn decode_snapshot(builder: &mut IndexBuilder, root: Map<String, Value>) -> Result<()> {
    if is_shared_layout(&root) {
        return decode_shared(builder, root);
    }
    let countries: BTreeMap<String, Value> = root.into_iter().collect();
    for (name, entry) in countries {
        let raw: CountryRaw = serde_json::from_value(entry)
            .map_err(|e| LocationError::data_format(&name, e.to_string()))?;
        decode_country(builder, &name, &raw.keys, &raw.data)?;
    }
    Ok(())
}

fn is_shared_layout(root: &Map<String, Value>) -> bool {
    root.len() == 2 && root.get(KEYS).is_some_and(Value::is_array) && root.get(DATA).is_some_and(Value::is_object)
}

fn decode_shared(builder: &mut IndexBuilder, mut root: Map<String, Value>) -> Result<()> {
    let keys: Vec<String> = serde_json::from_value(root.remove(KEYS).unwrap_or_default())
        .map_err(|e| LocationError::data_format(KEYS, e.to_string()))?;
    let Some(Value::Object(data)) = root.remove(DATA) else {
        return Err(LocationError::data_format(DATA, "expected an object of countries"));
    };
    let countries: BTreeMap<String, Value> = data.into_iter().collect();
    for (name, values) in countries {
        let Value::Array(values) = values else {
            return Err(LocationError::data_format(&name, "'data' must be an array"));
        };
        decode_country(builder, &name, &keys, &values)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::convert::{BuildOptions, BuildPolicy};
    use serde_json::json;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn layout_accepts_any_order() {
        let layout = FieldLayout::from_keys(&keys(&["lat", "name", "lon"])).unwrap();
        let record = layout
            .decode(&[json!([52, 13]), json!("Warsaw"), json!([21, 0, 36])])
            .unwrap();
        assert_eq!(record.name, "Warsaw");
        assert_eq!(record.lat, vec![52.0, 13.0]);
        assert_eq!(record.lon, vec![21.0, 0.0, 36.0]);
    }

    #[test]
    fn layout_rejects_unknown_missing_and_duplicate_keys() {
        assert!(FieldLayout::from_keys(&[]).is_err());
        assert!(FieldLayout::from_keys(&keys(&["name", "lat", "lon", "region"]))
            .unwrap_err()
            .contains("unknown key 'region'"));
        assert!(FieldLayout::from_keys(&keys(&["name", "lat"]))
            .unwrap_err()
            .contains("missing key 'lon'"));
        assert!(FieldLayout::from_keys(&keys(&["name", "lat", "lat", "lon"]))
            .unwrap_err()
            .contains("duplicate"));
    }

    #[test]
    fn coordinates_must_be_short_numeric_arrays() {
        let layout = FieldLayout::from_keys(&keys(&["name", "lat", "lon"])).unwrap();
        assert!(layout.decode(&[json!("A"), json!(52), json!([1])]).is_err());
        assert!(layout.decode(&[json!("A"), json!([]), json!([1])]).is_err());
        assert!(layout.decode(&[json!("A"), json!([1, 2, 3, 4]), json!([1])]).is_err());
        assert!(layout.decode(&[json!("A"), json!(["52"]), json!([1])]).is_err());
        assert!(layout.decode(&[json!(7), json!([1]), json!([1])]).is_err());
    }

    #[test]
    fn data_length_must_be_a_multiple() {
        let mut builder = IndexBuilder::new(BuildOptions {
            policy: BuildPolicy::SkipInvalid,
        });
        let err = decode_country(
            &mut builder,
            "Poland",
            &keys(&["name", "lat", "lon"]),
            &[json!("Opole"), json!([50]), json!([17]), json!("Radom")],
        )
        .unwrap_err();
        assert!(matches!(err, LocationError::DataFormat { .. }));
    }

    #[test]
    fn shared_layout_is_detected() {
        let root = json!({
            "keys": ["name", "lat", "lon"],
            "data": { "Poland": ["Opole", [50, 40], [17, 56]] }
        });
        let Value::Object(root) = root else { unreachable!() };
        assert!(is_shared_layout(&root));

        let mut builder = IndexBuilder::new(BuildOptions::default());
        decode_snapshot(&mut builder, root).unwrap();
        let index = builder.build().unwrap();
        assert_eq!(index.cities.len(), 1);
        assert_eq!(index.countries[0].name, "Poland");
    }

    #[test]
    fn per_country_entry_without_data_fails() {
        let root = json!({ "Poland": { "keys": ["name", "lat", "lon"] } });
        let Value::Object(root) = root else { unreachable!() };
        let mut builder = IndexBuilder::new(BuildOptions::default());
        let err = decode_snapshot(&mut builder, root).unwrap_err();
        assert!(err.to_string().contains("Poland"), "{err}");
    }
}
