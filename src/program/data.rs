//! Plutus Data terms.
//!
//! [`PlutusData`] is the value type every datum, redeemer and script parameter
//! is built from. It is totally ordered so it can serve as a map key.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::program::error::{SdkError, SdkResult};

/// A Plutus Data term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlutusData {
    /// Constructor alternative with positional fields
    Constr { tag: u64, fields: Vec<PlutusData> },
    /// Key/value map (keys sorted, duplicates collapse)
    Map(BTreeMap<PlutusData, PlutusData>),
    /// Ordered list
    List(Vec<PlutusData>),
    /// Signed integer
    Integer(i128),
    /// Byte string
    Bytes(Vec<u8>),
}

impl PlutusData {
    /// Build a constructor term.
    pub fn constr(tag: u64, fields: Vec<PlutusData>) -> Self {
        PlutusData::Constr { tag, fields }
    }

    /// Build a byte string from UTF-8 text.
    pub fn text(s: &str) -> Self {
        PlutusData::Bytes(s.as_bytes().to_vec())
    }

    /// Build a byte string from a hex string.
    pub fn from_hex_bytes(s: &str) -> SdkResult<Self> {
        Ok(PlutusData::Bytes(hex::decode(s)?))
    }

    /// Build a map from key/value pairs.
    pub fn map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (PlutusData, PlutusData)>,
    {
        PlutusData::Map(entries.into_iter().collect())
    }

    /// The name of this term's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PlutusData::Constr { .. } => "constr",
            PlutusData::Map(_) => "map",
            PlutusData::List(_) => "list",
            PlutusData::Integer(_) => "integer",
            PlutusData::Bytes(_) => "bytes",
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            PlutusData::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PlutusData::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Convert to the detailed JSON schema used by cardano-cli.
    pub fn to_json(&self) -> Value {
        match self {
            PlutusData::Constr { tag, fields } => json!({
                "constructor": tag,
                "fields": fields.iter().map(PlutusData::to_json).collect::<Vec<_>>(),
            }),
            PlutusData::Map(entries) => json!({
                "map": entries
                    .iter()
                    .map(|(k, v)| json!({ "k": k.to_json(), "v": v.to_json() }))
                    .collect::<Vec<_>>(),
            }),
            PlutusData::List(items) => json!({
                "list": items.iter().map(PlutusData::to_json).collect::<Vec<_>>(),
            }),
            PlutusData::Integer(i) => match (i64::try_from(*i), u64::try_from(*i)) {
                (Ok(n), _) => json!({ "int": n }),
                (_, Ok(n)) => json!({ "int": n }),
                // Outside the JSON number range serde_json supports; keep the digits.
                _ => json!({ "int": i.to_string() }),
            },
            PlutusData::Bytes(b) => json!({ "bytes": hex::encode(b) }),
        }
    }

    /// Parse the detailed JSON schema used by cardano-cli.
    pub fn from_json(value: &Value) -> SdkResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| invalid_json("expected an object", value))?;

        if let Some(tag) = obj.get("constructor") {
            let tag = tag
                .as_u64()
                .ok_or_else(|| invalid_json("constructor must be a non-negative integer", tag))?;
            let fields = obj
                .get("fields")
                .and_then(Value::as_array)
                .ok_or_else(|| invalid_json("constructor requires a fields array", value))?;
            let fields = fields
                .iter()
                .map(PlutusData::from_json)
                .collect::<SdkResult<Vec<_>>>()?;
            return Ok(PlutusData::Constr { tag, fields });
        }

        if let Some(entries) = obj.get("map") {
            let entries = entries
                .as_array()
                .ok_or_else(|| invalid_json("map must be an array", entries))?;
            let mut map = BTreeMap::new();
            for entry in entries {
                let k = entry
                    .get("k")
                    .ok_or_else(|| invalid_json("map entry requires k", entry))?;
                let v = entry
                    .get("v")
                    .ok_or_else(|| invalid_json("map entry requires v", entry))?;
                let key = PlutusData::from_json(k)?;
                if map.contains_key(&key) {
                    return Err(invalid_json("duplicate map key", k));
                }
                map.insert(key, PlutusData::from_json(v)?);
            }
            return Ok(PlutusData::Map(map));
        }

        if let Some(items) = obj.get("list") {
            let items = items
                .as_array()
                .ok_or_else(|| invalid_json("list must be an array", items))?;
            let items = items
                .iter()
                .map(PlutusData::from_json)
                .collect::<SdkResult<Vec<_>>>()?;
            return Ok(PlutusData::List(items));
        }

        if let Some(int) = obj.get("int") {
            let parsed = match int {
                Value::Number(n) => n
                    .as_i64()
                    .map(i128::from)
                    .or_else(|| n.as_u64().map(i128::from)),
                Value::String(s) => s.parse::<i128>().ok(),
                _ => None,
            };
            return parsed
                .map(PlutusData::Integer)
                .ok_or_else(|| invalid_json("int out of range", int));
        }

        if let Some(bytes) = obj.get("bytes") {
            let s = bytes
                .as_str()
                .ok_or_else(|| invalid_json("bytes must be a hex string", bytes))?;
            return PlutusData::from_hex_bytes(s);
        }

        Err(invalid_json("unknown data term", value))
    }
}

fn invalid_json(msg: &str, value: &Value) -> SdkError {
    SdkError::InvalidDataJson(format!("{}: {}", msg, value))
}

impl From<i128> for PlutusData {
    fn from(value: i128) -> Self {
        PlutusData::Integer(value)
    }
}

impl From<i64> for PlutusData {
    fn from(value: i64) -> Self {
        PlutusData::Integer(value.into())
    }
}

impl From<u64> for PlutusData {
    fn from(value: u64) -> Self {
        PlutusData::Integer(value.into())
    }
}

impl From<Vec<u8>> for PlutusData {
    fn from(value: Vec<u8>) -> Self {
        PlutusData::Bytes(value)
    }
}

impl From<&[u8]> for PlutusData {
    fn from(value: &[u8]) -> Self {
        PlutusData::Bytes(value.to_vec())
    }
}

impl Serialize for PlutusData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PlutusData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        PlutusData::from_json(&value).map_err(serde::de::Error::custom)
    }
}
