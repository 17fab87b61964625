//! Order-preserving codec.
//!
//! `Serialize` writes members in chain order; `Deserialize` applies members
//! through [`OrderedHashMap::set`] in the order they appear in the input, so
//! the decoded map iterates in source order. Both require `K: TextKey`.
//!
//! Decoding clears the target first and clears it again if anything fails:
//! callers never observe a partially decoded map. To keep the old contents
//! on failure, decode into a fresh map and swap on success.

use crate::error::{MapError, Result};
use crate::key::TextKey;
use crate::ordered_map::OrderedHashMap;
use core::fmt;
use core::hash::BuildHasher;
use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
use serde::ser::{self, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::io;

impl<K, V, S> Serialize for OrderedHashMap<K, V, S>
where
    K: TextKey,
    V: Serialize,
{
    fn serialize<Se>(&self, serializer: Se) -> core::result::Result<Se::Ok, Se::Error>
    where
        Se: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_key(key.as_text())?;
            map.serialize_value(value).map_err(|e| {
                <Se::Error as ser::Error>::custom(format_args!("member {:?}: {}", key.as_text(), e))
            })?;
        }
        map.end()
    }
}

/// Decodes one object (or `null`) into a borrowed map.
///
/// Shared by the map's `Deserialize`, the JSON helpers and
/// [`Value`](crate::Value) objects, so nested maps at any depth go through
/// the same member loop.
pub(crate) struct MapVisitor<'a, K, V, S> {
    map: &'a mut OrderedHashMap<K, V, S>,
}

impl<'a, K, V, S> MapVisitor<'a, K, V, S> {
    pub(crate) fn new(map: &'a mut OrderedHashMap<K, V, S>) -> Self {
        Self { map }
    }
}

impl<'de, K, V, S> Visitor<'de> for MapVisitor<'_, K, V, S>
where
    K: TextKey + Deserialize<'de>,
    V: Deserialize<'de>,
    S: BuildHasher,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with string member names, or null")
    }

    fn visit_none<E: de::Error>(self) -> core::result::Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> core::result::Result<(), E> {
        Ok(())
    }

    fn visit_some<D>(self, deserializer: D) -> core::result::Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A>(self, mut access: A) -> core::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(key) = access.next_key::<K>()? {
            let value = access.next_value::<V>().map_err(|e| {
                <A::Error as de::Error>::custom(format_args!(
                    "invalid value for member {:?}: {}",
                    key.as_text(),
                    e
                ))
            })?;
            self.map.set(key, value);
        }
        Ok(())
    }
}

/// Clear `map`, then decode into it. Leaves `map` empty on failure.
pub(crate) fn decode_into<'de, D, K, V, S>(
    deserializer: D,
    map: &mut OrderedHashMap<K, V, S>,
) -> core::result::Result<(), D::Error>
where
    D: Deserializer<'de>,
    K: TextKey + Deserialize<'de>,
    V: Deserialize<'de>,
    S: BuildHasher,
{
    map.clear();
    let result = deserializer.deserialize_option(MapVisitor::new(map));
    if let Err(err) = &result {
        map.clear();
        tracing::debug!(error = %err, "ordered map decode failed; contents discarded");
    }
    result
}

/// `null` decodes as an empty map. A struct field of this type that is
/// absent from the input also decodes as an empty map, the way an `Option`
/// field decodes as `None`.
impl<'de, K, V, S> Deserialize<'de> for OrderedHashMap<K, V, S>
where
    K: TextKey + Deserialize<'de>,
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Self::default();
        decode_into(deserializer, &mut map)?;
        Ok(map)
    }
}

impl<K, V, S> OrderedHashMap<K, V, S>
where
    K: TextKey,
    S: BuildHasher,
{
    /// Compact JSON with members in iteration order.
    ///
    /// ```
    /// use ordered_hashmap::OrderedHashMap;
    ///
    /// let mut m = OrderedHashMap::new();
    /// m.set("z".to_string(), 1);
    /// m.set("a".to_string(), 2);
    /// assert_eq!(m.to_json().unwrap(), r#"{"z":1,"a":2}"#);
    /// ```
    pub fn to_json(&self) -> Result<String>
    where
        V: Serialize,
    {
        serde_json::to_string(self).map_err(MapError::Encode)
    }

    pub fn to_json_pretty(&self) -> Result<String>
    where
        V: Serialize,
    {
        serde_json::to_string_pretty(self).map_err(MapError::Encode)
    }

    pub fn write_json<W: io::Write>(&self, writer: W) -> Result<()>
    where
        V: Serialize,
    {
        serde_json::to_writer(writer, self).map_err(MapError::Encode)
    }

    /// Replace the contents with the members of `text`, in source order.
    ///
    /// `null` yields an empty map. On error the map is left empty.
    pub fn decode_json<'a>(&mut self, text: &'a str) -> Result<()>
    where
        K: Deserialize<'a>,
        V: Deserialize<'a>,
    {
        let mut de = serde_json::Deserializer::from_str(text);
        decode_into(&mut de, self)
            .and_then(|()| de.end())
            .map_err(|e| {
                self.clear();
                MapError::MalformedInput(e)
            })
    }

    pub fn from_json<'a>(text: &'a str) -> Result<Self>
    where
        K: Deserialize<'a>,
        V: Deserialize<'a>,
        S: Default,
    {
        let mut map = Self::default();
        map.decode_json(text)?;
        Ok(map)
    }

    pub fn from_json_reader<R: io::Read>(reader: R) -> Result<Self>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
        S: Default,
    {
        let mut map = Self::default();
        let mut de = serde_json::Deserializer::from_reader(reader);
        decode_into(&mut de, &mut map)
            .and_then(|()| de.end())
            .map_err(MapError::MalformedInput)?;
        Ok(map)
    }
}

/// Deserialize adapter that reuses an existing map's allocation.
///
/// `seed.deserialize(d)` behaves like [`OrderedHashMap::decode_json`] for an
/// arbitrary `serde` format.
pub struct DecodeInto<'a, K, V, S> {
    map: &'a mut OrderedHashMap<K, V, S>,
}

impl<'a, K, V, S> DecodeInto<'a, K, V, S> {
    pub fn new(map: &'a mut OrderedHashMap<K, V, S>) -> Self {
        Self { map }
    }
}

impl<'de, K, V, S> de::DeserializeSeed<'de> for DecodeInto<'_, K, V, S>
where
    K: TextKey + Deserialize<'de>,
    V: Deserialize<'de>,
    S: BuildHasher,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> core::result::Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        decode_into(deserializer, self.map)
    }
}
