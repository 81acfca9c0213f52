//! Object-only decoding for provider DTOs.
//!
//! serde's derived struct visitor also accepts a JSON array of field values in
//! declaration order, so `[null, null]` would decode as a struct. Provider
//! documents only ever carry objects in these positions; anything else is a
//! type mismatch. These helpers read a `serde_json::Map` first and only then
//! hand it to the derived impl.

use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error as _};
use serde_json::{Map, Value};

pub(crate) fn from_map<T: DeserializeOwned>(map: Map<String, Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(map))
}

/// Decode a top-level JSON object.
pub(crate) fn from_str<T: DeserializeOwned>(json: &str) -> Result<T, serde_json::Error> {
    from_map(serde_json::from_str(json)?)
}

/// Decode a top-level JSON array whose elements must all be objects.
pub(crate) fn list_from_str<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, serde_json::Error> {
    let maps: Vec<Map<String, Value>> = serde_json::from_str(json)?;
    maps.into_iter().map(from_map).collect()
}

/// `deserialize_with` for an optional object field. Pair with `#[serde(default)]`.
pub(crate) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Option::<Map<String, Value>>::deserialize(deserializer)?
        .map(|map| from_map(map).map_err(D::Error::custom))
        .transpose()
}

/// `deserialize_with` for an optional array of objects. Pair with `#[serde(default)]`.
pub(crate) fn optional_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Option::<Vec<Map<String, Value>>>::deserialize(deserializer)?
        .map(|maps| {
            maps.into_iter()
                .map(|map| from_map(map).map_err(D::Error::custom))
                .collect()
        })
        .transpose()
}
