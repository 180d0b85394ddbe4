//! Interoperation with `serde` and `serde_json`
//!
//! Enabled by the `serde_impls` feature. [`Raw`] trees serialize as the
//! natural self-describing structure (maps, sequences, scalars, unit for
//! null), and any self-describing format can be deserialized into one.
//! Typed [`Object`]s serialize through their default representation.
//!
//! Symbolic and string keys both serialize as plain strings, and
//! deserialized keys are always [`Key::Str`]. Integers that do not fit in
//! 64 bits are written as decimal strings.

use crate::conv::Represent;
use crate::object::Object;
use crate::raw::{Key, Mapping, Raw, Scalar};
use num_bigint::BigInt;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt::Formatter;

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Key::Str)
    }
}

fn serialize_int<S: Serializer>(i: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    if let Ok(n) = i64::try_from(i) {
        serializer.serialize_i64(n)
    } else if let Ok(n) = u64::try_from(i) {
        serializer.serialize_u64(n)
    } else {
        serializer.serialize_str(&i.to_string())
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serialize_int(i, serializer),
            Scalar::Float(x) => serializer.serialize_f64(*x),
            Scalar::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Scalar(s) => Ok(s),
            other => Err(de::Error::custom(format_args!("expected a scalar, found {other}"))),
        }
    }
}

impl Serialize for Raw {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Raw::Null => serializer.serialize_unit(),
            Raw::Scalar(s) => s.serialize(serializer),
            Raw::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Raw::Mapping(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

struct RawVisitor;

impl<'de> Visitor<'de> for RawVisitor {
    type Value = Raw;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a null, scalar, sequence, or map")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Raw, E> {
        Ok(Raw::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Raw, E> {
        Ok(Raw::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Raw, D::Error> {
        Raw::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Raw, E> {
        Ok(Raw::from(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Raw, E> {
        Ok(Raw::from(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Raw, E> {
        Ok(Raw::from(n))
    }

    fn visit_i128<E: de::Error>(self, n: i128) -> Result<Raw, E> {
        Ok(Raw::from(BigInt::from(n)))
    }

    fn visit_u128<E: de::Error>(self, n: u128) -> Result<Raw, E> {
        Ok(Raw::from(BigInt::from(n)))
    }

    fn visit_f64<E: de::Error>(self, x: f64) -> Result<Raw, E> {
        Ok(Raw::from(x))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Raw, E> {
        Ok(Raw::from(s))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Raw, E> {
        Ok(Raw::from(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Raw, A::Error> {
        let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(item) = access.next_element::<Raw>()? {
            items.push(item);
        }
        Ok(Raw::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Raw, A::Error> {
        let mut m = Mapping::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<Key, Raw>()? {
            m.insert(k, v);
        }
        Ok(Raw::Mapping(m))
    }
}

impl<'de> Deserialize<'de> for Raw {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawVisitor)
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_hash().serialize(serializer)
    }
}

impl Raw {
    /// Converts a parsed JSON document into a raw tree.
    ///
    /// Numbers become integers when they are integral and fit in 64 bits,
    /// floats otherwise. Object keys become [`Key::Str`].
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Raw::Null,
            Json::Bool(b) => Raw::from(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Raw::from(i)
                } else if let Some(u) = n.as_u64() {
                    Raw::from(u)
                } else {
                    Raw::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Raw::from(s),
            Json::Array(items) => Raw::sequence(items.into_iter().map(Raw::from_json)),
            Json::Object(map) => Raw::Mapping(
                map.into_iter()
                    .map(|(k, v)| (Key::Str(k), Raw::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts a raw tree into a JSON document.
    ///
    /// Non-finite floats become `null`; integers wider than 64 bits become
    /// decimal strings.
    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Raw::Null => Json::Null,
            Raw::Scalar(Scalar::Bool(b)) => Json::Bool(b),
            Raw::Scalar(Scalar::Int(i)) => match (i64::try_from(&i), u64::try_from(&i)) {
                (Ok(n), _) => Json::from(n),
                (Err(_), Ok(n)) => Json::from(n),
                (Err(_), Err(_)) => Json::String(i.to_string()),
            },
            Raw::Scalar(Scalar::Float(x)) => {
                serde_json::Number::from_f64(x).map_or(Json::Null, Json::Number)
            }
            Raw::Scalar(Scalar::Str(s)) => Json::String(s),
            Raw::Sequence(items) => Json::Array(items.into_iter().map(Raw::into_json).collect()),
            Raw::Mapping(m) => Json::Object(
                m.into_iter()
                    .map(|(k, v)| (k.into_string(), v.into_json()))
                    .collect(),
            ),
        }
    }
}
