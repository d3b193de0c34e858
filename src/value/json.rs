//! Serde support and conversions to and from `serde_json`.

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};

use super::{Map, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => number.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(string) => Self::String(string),
            serde_json::Value::Array(list) => {
                Self::List(list.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(object) => Self::Map(
                object
                    .into_iter()
                    .map(|(key, element)| (key, Self::from(element)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Converts to a `serde_json::Value` with map keys in sorted order.
    ///
    /// `Absent` map entries are dropped; an `Absent` root or list element
    /// becomes `null`. Non-finite numbers also become `null`, as JSON has no
    /// spelling for them. Sorting makes the rendering canonical, so two trees
    /// that differ only in key order produce the same text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Absent | Self::Null => serde_json::Value::Null,
            Self::Bool(flag) => serde_json::Value::Bool(*flag),
            Self::Number(number) => json_number(*number),
            Self::String(string) => serde_json::Value::String(string.clone()),
            Self::List(list) => serde_json::Value::Array(list.iter().map(Self::to_json).collect()),
            Self::Map(map) => {
                let mut entries: Vec<_> = map
                    .iter()
                    .filter(|(_, element)| !element.is_absent())
                    .collect();
                entries.sort_by(|(left, _), (right, _)| left.cmp(right));
                serde_json::Value::Object(
                    entries
                        .into_iter()
                        .map(|(key, element)| (key.clone(), element.to_json()))
                        .collect(),
                )
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn json_number(number: f64) -> serde_json::Value {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        serde_json::Value::from(number as i64)
    } else {
        serde_json::Number::from_f64(number)
            .map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Absent | Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Number(number) => serializer.serialize_f64(*number),
            Self::String(string) => serializer.serialize_str(string),
            Self::List(list) => {
                let mut sequence = serializer.serialize_seq(Some(list.len()))?;
                for element in list {
                    sequence.serialize_element(element)?;
                }
                sequence.end()
            }
            Self::Map(map) => {
                let present = map.values().filter(|element| !element.is_absent()).count();
                let mut entries = serializer.serialize_map(Some(present))?;
                for (key, element) in map {
                    if !element.is_absent() {
                        entries.serialize_entry(key, element)?;
                    }
                }
                entries.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a decoded document value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E>(self, flag: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(flag))
    }

    fn visit_i64<E>(self, number: i64) -> Result<Self::Value, E> {
        Ok(Value::from(number))
    }

    fn visit_u64<E>(self, number: u64) -> Result<Self::Value, E> {
        Ok(Value::from(number))
    }

    fn visit_f64<E>(self, number: f64) -> Result<Self::Value, E> {
        Ok(Value::Number(number))
    }

    fn visit_str<E>(self, string: &str) -> Result<Self::Value, E> {
        Ok(Value::from(string))
    }

    fn visit_string<E>(self, string: String) -> Result<Self::Value, E> {
        Ok(Value::String(string))
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut list = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(element) = access.next_element()? {
            list.push(element);
        }
        Ok(Value::List(list))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, element)) = access.next_entry()? {
            map.insert(key, element);
        }
        Ok(Value::Map(map))
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_shape() {
        let value = Value::from(json!({"name": "http", "port": 80, "tags": [true, null]}));
        let map = value.as_map().expect("map");
        assert_eq!(map["name"], Value::from("http"));
        assert_eq!(map["port"], Value::Number(80.0));
        assert_eq!(map["tags"], Value::List(vec![Value::Bool(true), Value::Null]));
    }

    #[test]
    fn test_to_json_sorts_keys_and_skips_absent() {
        let value: Value = [
            ("zeta".to_string(), Value::from(1)),
            ("gone".to_string(), Value::Absent),
            ("alpha".to_string(), Value::from(2)),
        ]
        .into_iter()
        .collect();
        let text = serde_json::to_string(&value.to_json()).expect("serialise");
        assert_eq!(text, r#"{"alpha":2,"zeta":1}"#);
    }

    #[test]
    fn test_deserialize_roundtrip() {
        let text = r#"{"kind":"Service","spec":{"ports":[{"port":80}]}}"#;
        let value: Value = serde_json::from_str(text).expect("deserialise");
        let json: serde_json::Value = serde_json::from_str(text).expect("json");
        assert_eq!(value, Value::from(json));
        assert_eq!(serde_json::to_string(&value.to_json()).expect("serialise"), text);
    }
}
