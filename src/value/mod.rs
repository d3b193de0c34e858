//! The decoded document tree.
//!
//! [`Value`] is the generic tree every other module operates on: the shape a
//! YAML or JSON decoder produces, plus one extra variant, [`Value::Absent`],
//! which stands for "no value in this slot". `Absent` is distinct from a
//! present `null` and never appears in a well-formed decoded document; it is
//! what patterns see when a named key is missing and what erasure leaves
//! behind when a whole slot was consumed.
//!
//! Maps preserve insertion order so that anything walking a map (error
//! reporting, telescope resolution) is deterministic.
//!
//! # Examples
//!
//! ```rust
//! use shorthand::value::{Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("name".to_string(), Value::from("http"));
//! map.insert("port".to_string(), Value::from(80));
//!
//! let value = Value::from(map);
//! assert_eq!(value.to_string(), r#"{"name": "http", "port": 80}"#);
//! ```

#[cfg(feature = "serde")]
mod json;

use std::fmt;

use indexmap::IndexMap;

/// An insertion-ordered map from keys to values.
pub type Map = IndexMap<String, Value>;

/// A node of a decoded document tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value present in this slot.
    #[default]
    Absent,
    /// An explicit `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// Any number. Decoders normalise integers to `f64`.
    Number(f64),
    /// A string.
    String(String),
    /// A list of values.
    List(Vec<Value>),
    /// A map with string keys.
    Map(Map),
}

impl Value {
    /// Returns `true` for [`Value::Absent`].
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }

    /// Returns the number if this is a number.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the map if this is a map.
    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the map mutably if this is a map.
    pub const fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the elements if this is a list.
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Short name of the variant, used in type mismatch errors.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Moves the value out, leaving [`Value::Absent`] in its place.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

macro_rules! impl_from_number {
    ($($numeric:ty),* $(,)?) => {
        $(
            impl From<$numeric> for Value {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn from(number: $numeric) -> Self {
                    Self::Number(number as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32);

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Self::String(string.to_string())
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Self::String(string)
    }
}

impl From<Vec<Self>> for Value {
    fn from(list: Vec<Self>) -> Self {
        Self::List(list)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl FromIterator<(String, Self)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Self)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().collect())
    }
}

impl FromIterator<Self> for Value {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => formatter.write_str("<absent>"),
            Self::Null => formatter.write_str("null"),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Number(number) => write_number(formatter, *number),
            Self::String(string) => write!(formatter, "{string:?}"),
            Self::List(list) => {
                formatter.write_str("[")?;
                for (index, element) in list.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{element}")?;
                }
                formatter.write_str("]")
            }
            Self::Map(map) => {
                formatter.write_str("{")?;
                for (index, (key, element)) in map.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{key:?}: {element}")?;
                }
                formatter.write_str("}")
            }
        }
    }
}

/// Integral numbers print without a fractional part, as a decoder's input would.
pub(crate) fn write_number(formatter: &mut impl fmt::Write, number: f64) -> fmt::Result {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let integral = number as i64;
        write!(formatter, "{integral}")
    } else {
        write!(formatter, "{number}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Absent, "<absent>")]
    #[case(Value::Null, "null")]
    #[case(Value::from(true), "true")]
    #[case(Value::from(80), "80")]
    #[case(Value::from(1.5), "1.5")]
    #[case(Value::from("TCP"), "\"TCP\"")]
    #[case(Value::from(vec![Value::from(1), Value::Null]), "[1, null]")]
    fn test_display(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn test_integers_normalise_to_numbers() {
        assert_eq!(Value::from(8080_u16), Value::Number(8080.0));
        assert_eq!(Value::from(-3_i64), Value::Number(-3.0));
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let value: Value = [("b", 1), ("a", 2)]
            .into_iter()
            .map(|(key, number)| (key.to_string(), Value::from(number)))
            .collect();
        let keys: Vec<_> = value.as_map().into_iter().flat_map(Map::keys).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_take_leaves_absent() {
        let mut value = Value::from("x");
        let taken = value.take();
        assert_eq!(taken, Value::from("x"));
        assert!(value.is_absent());
    }

    #[test]
    fn test_absent_is_not_null() {
        assert_ne!(Value::Absent, Value::Null);
        assert_eq!(Value::Absent.type_name(), "absent");
    }
}
