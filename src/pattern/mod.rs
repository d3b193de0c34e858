//! Declarative patterns over [`Value`] trees.
//!
//! A [`Pattern`] is an immutable template. Matching it against a value yields a
//! fresh [`Matched`] tree holding the captures and local errors of that one
//! match, so a single pattern can serve any number of matches, including
//! concurrent ones.
//!
//! A pattern plays three roles:
//!
//! 1. **Matcher**: [`Pattern::matches`] checks a value's shape and captures the
//!    values under each leaf.
//! 2. **Eraser**: [`Pattern::erase`] removes everything a successful match
//!    covered and returns what is left.
//! 3. **Writer**: [`Pattern::write`] inserts its constants into a value,
//!    refusing to overwrite anything already present.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use shorthand::exclusive;
//! use shorthand::pattern::WildcardKind;
//! use shorthand::value::Value;
//!
//! let port = exclusive! {
//!     "name" => WildcardKind::String,
//!     "port" => WildcardKind::Number,
//! };
//!
//! let input = Value::from(json!({"name": "http", "port": 80}));
//! let matched = port.matches(&input);
//! assert!(!matched.has_errors());
//! assert_eq!(matched.extract(), input);
//!
//! // Everything was covered, so nothing remains.
//! assert!(port.erase(input).is_absent());
//!
//! let extra = Value::from(json!({"name": "http", "port": 80, "protocol": "TCP"}));
//! assert!(port.matches(&extra).has_errors());
//! ```

mod matched;

pub use matched::Matched;

use std::collections::HashSet;
use std::fmt;

use crate::error::InvariantError;
use crate::value::{Map, Value};

/// The shape a wildcard accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildcardKind {
    /// Anything, including an absent slot.
    Any,
    /// Only strings.
    String,
    /// Only numbers.
    Number,
}

impl WildcardKind {
    /// Returns `true` if a wildcard of this kind accepts `value` without error.
    pub const fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::String => matches!(value, Value::String(_)),
            Self::Number => matches!(value, Value::Number(_)),
        }
    }
}

impl fmt::Display for WildcardKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Any => "any",
            Self::String => "string",
            Self::Number => "number",
        })
    }
}

/// A named slot inside a fields pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    pattern: Pattern,
}

impl Field {
    /// Creates a field matching `pattern` against the map entry `name`.
    pub fn new(name: impl Into<String>, pattern: impl Into<Pattern>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// The key this field matches.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pattern applied to the entry.
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// An ordered list of uniquely named fields.
///
/// Order is significant: [`Pattern::wildcard_path`] prefers earlier fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    fields: Vec<Field>,
    exclusive: bool,
}

impl Fields {
    /// The fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Whether keys not named by a field are a match error.
    pub const fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Looks a field up by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    /// Returns `true` if some field is named `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// A declarative template over [`Value`] trees.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Matches only an equal value; written as that value.
    Constant(Value),
    /// Matches any value of the given shape.
    Wildcard(WildcardKind),
    /// Matches a map field by field.
    Fields(Fields),
}

impl Pattern {
    /// A constant pattern.
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    /// A wildcard pattern.
    pub const fn wildcard(kind: WildcardKind) -> Self {
        Self::Wildcard(kind)
    }

    /// A wildcard accepting anything.
    pub const fn any() -> Self {
        Self::Wildcard(WildcardKind::Any)
    }

    /// Builds a fields pattern, checking that field names are unique.
    ///
    /// # Errors
    ///
    /// [`InvariantError::DuplicateField`] naming the first repeated field.
    pub fn try_fields(
        fields: impl IntoIterator<Item = Field>,
        exclusive: bool,
    ) -> Result<Self, InvariantError> {
        let fields: Vec<Field> = fields.into_iter().collect();
        let duplicate = {
            let mut seen = HashSet::with_capacity(fields.len());
            fields
                .iter()
                .find(|field| !seen.insert(field.name.as_str()))
                .map(|field| field.name.clone())
        };
        match duplicate {
            Some(name) => Err(InvariantError::DuplicateField(name)),
            None => Ok(Self::Fields(Fields { fields, exclusive })),
        }
    }

    /// A fields pattern that lets unnamed keys pass through untouched.
    ///
    /// # Panics
    ///
    /// Panics if two fields share a name. Pattern literals are written by
    /// hand, so a duplicate is a bug in the literal; use
    /// [`Pattern::try_fields`] for patterns assembled at run time.
    pub fn partial(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::literal(fields, false)
    }

    /// A fields pattern that rejects maps with keys it does not name.
    ///
    /// # Panics
    ///
    /// Panics if two fields share a name, like [`Pattern::partial`].
    pub fn exclusive(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::literal(fields, true)
    }

    fn literal(fields: impl IntoIterator<Item = Field>, exclusive: bool) -> Self {
        match Self::try_fields(fields, exclusive) {
            Ok(pattern) => pattern,
            Err(error) => panic!("invalid pattern literal: {error}"),
        }
    }

    /// Returns `true` for constants and wildcards.
    pub const fn is_leaf(&self) -> bool {
        !matches!(self, Self::Fields(_))
    }

    /// Matches this pattern against `value`, returning the captures.
    pub fn matches(&self, value: &Value) -> Matched<'_> {
        let mut matched = Matched::new(self);
        matched.rematch(value);
        matched
    }

    /// Projects the literal content of the template: constants as written,
    /// wildcards as [`Value::Absent`].
    pub fn extract(&self) -> Value {
        match self {
            Self::Constant(value) => value.clone(),
            Self::Wildcard(_) => Value::Absent,
            Self::Fields(fields) => fields
                .fields
                .iter()
                .map(|field| (field.name.clone(), field.pattern.extract()))
                .collect(),
        }
    }

    /// Removes what this pattern matched from `value` and returns the rest.
    ///
    /// Leaves consume their whole slot. A fields pattern erases inside each
    /// named entry and drops entries that became absent; a map left empty is
    /// itself reported as absent so that the parent drops it in turn.
    ///
    /// `value` is expected to have matched. A fields pattern over a non-map
    /// returns it unchanged.
    pub fn erase(&self, value: Value) -> Value {
        match self {
            Self::Constant(_) | Self::Wildcard(_) => Value::Absent,
            Self::Fields(fields) => match value {
                Value::Map(mut map) => {
                    for field in &fields.fields {
                        if let Some(slot) = map.get_mut(&field.name) {
                            let erased = field.pattern.erase(slot.take());
                            *slot = erased;
                        }
                    }
                    map.retain(|_, remaining| !remaining.is_absent());
                    if map.is_empty() {
                        Value::Absent
                    } else {
                        Value::Map(map)
                    }
                }
                other => other,
            },
        }
    }

    /// Writes the constants of this pattern into `value`.
    ///
    /// Every slot written must currently be absent. A fields pattern writes
    /// into an absent slot (creating a map) or merges into an existing map.
    /// It always yields a map, even one left empty: a fields pattern only
    /// matches a present map, and erasure may have reduced that map to
    /// absent.
    /// Writing an absent constant leaves the slot as it is.
    ///
    /// # Errors
    ///
    /// - [`InvariantError::Overwrite`] if a slot already holds a value.
    /// - [`InvariantError::ExpectedMapOrAbsent`] if a fields pattern meets a
    ///   scalar or list.
    /// - [`InvariantError::UnboundWildcard`] for a wildcard leaf, which has
    ///   nothing to write.
    pub fn write(&self, value: Value) -> Result<Value, InvariantError> {
        match self {
            Self::Constant(constant) => write_leaf(constant, value),
            Self::Wildcard(_) => Err(InvariantError::UnboundWildcard),
            Self::Fields(fields) => {
                let mut map = match value {
                    Value::Absent => Map::new(),
                    Value::Map(map) => map,
                    other => return Err(InvariantError::ExpectedMapOrAbsent(other)),
                };

                for field in &fields.fields {
                    if let Some(slot) = map.get_mut(&field.name) {
                        let written = field.pattern.write(slot.take())?;
                        *slot = written;
                    } else {
                        let written = field.pattern.write(Value::Absent)?;
                        if !written.is_absent() {
                            map.insert(field.name.clone(), written);
                        }
                    }
                }
                map.retain(|_, written| !written.is_absent());

                Ok(Value::Map(map))
            }
        }
    }

    /// Finds the chain of field names leading to a wildcard leaf.
    ///
    /// Fields are tried in declaration order and the first branch that reaches
    /// a wildcard wins. A bare wildcard yields the empty path.
    ///
    /// # Errors
    ///
    /// [`InvariantError::NotATelescope`] if no branch ends in a wildcard.
    pub fn wildcard_path(&self) -> Result<Vec<String>, InvariantError> {
        match self {
            Self::Wildcard(_) => Ok(Vec::new()),
            Self::Constant(_) => Err(InvariantError::NotATelescope),
            Self::Fields(fields) => fields
                .fields
                .iter()
                .find_map(|field| {
                    field.pattern.wildcard_path().ok().map(|mut path| {
                        path.insert(0, field.name.clone());
                        path
                    })
                })
                .ok_or(InvariantError::NotATelescope),
        }
    }

    /// Replaces the leaf at `path` with the constant `value`.
    ///
    /// # Errors
    ///
    /// [`InvariantError::SetConstPath`] if the path names a missing field,
    /// runs past a leaf, or stops at a fields pattern.
    pub fn set_const<K: AsRef<str>>(
        &mut self,
        path: &[K],
        value: Value,
    ) -> Result<(), InvariantError> {
        let failure = |reason| InvariantError::SetConstPath {
            path: path.iter().map(|key| key.as_ref().to_string()).collect(),
            reason,
        };

        let mut current = self;
        for key in path {
            current = match current {
                Self::Fields(fields) => &mut fields
                    .get_mut(key.as_ref())
                    .ok_or_else(|| failure("no field with that name"))?
                    .pattern,
                _ => return Err(failure("path runs past a leaf")),
            };
        }

        if current.is_leaf() {
            *current = Self::Constant(value);
            Ok(())
        } else {
            Err(failure("path ends at a fields pattern"))
        }
    }
}

static_assertions::assert_impl_all!(Pattern: Send, Sync);
static_assertions::assert_impl_all!(Matched<'static>: Send, Sync);

fn write_leaf(constant: &Value, slot: Value) -> Result<Value, InvariantError> {
    match (constant, slot) {
        (Value::Absent, slot) => Ok(slot),
        (constant, Value::Absent) => Ok(constant.clone()),
        (constant, existing) => Err(InvariantError::Overwrite {
            new: constant.clone(),
            existing,
        }),
    }
}

// =============================================================================
// Literal conversions
// =============================================================================

impl From<WildcardKind> for Pattern {
    fn from(kind: WildcardKind) -> Self {
        Self::Wildcard(kind)
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

macro_rules! impl_constant_pattern {
    ($($literal:ty),* $(,)?) => {
        $(
            impl From<$literal> for Pattern {
                fn from(literal: $literal) -> Self {
                    Self::Constant(Value::from(literal))
                }
            }
        )*
    };
}

impl_constant_pattern!(bool, &str, String, f64, f32, i32, i64, u16, u32, u64);

/// Builds a partial fields pattern: keys not listed pass through untouched.
///
/// Each entry is `name => pattern`, where the pattern is anything convertible
/// into a [`Pattern`]: a nested literal, a scalar constant or a
/// [`WildcardKind`].
///
/// # Panics
///
/// Panics if a name is repeated.
///
/// # Example
///
/// ```rust
/// use shorthand::partial;
/// use shorthand::pattern::{Pattern, WildcardKind};
///
/// let telescope = partial! {
///     "kind" => "Service",
///     "spec" => partial! { "ports" => WildcardKind::Any },
/// };
/// assert_eq!(telescope.wildcard_path().unwrap(), ["spec", "ports"]);
/// ```
#[macro_export]
macro_rules! partial {
    ($($name:expr => $pattern:expr),* $(,)?) => {
        $crate::pattern::Pattern::partial([
            $($crate::pattern::Field::new($name, $pattern)),*
        ])
    };
}

/// Builds an exclusive fields pattern: keys not listed are a match error.
///
/// Takes the same entries as [`partial!`].
///
/// # Panics
///
/// Panics if a name is repeated.
#[macro_export]
macro_rules! exclusive {
    ($($name:expr => $pattern:expr),* $(,)?) => {
        $crate::pattern::Pattern::exclusive([
            $($crate::pattern::Field::new($name, $pattern)),*
        ])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{exclusive, partial};

    fn map(entries: &[(&str, Value)]) -> Value {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_try_fields_rejects_duplicates() {
        let result = Pattern::try_fields(
            [Field::new("a", 1), Field::new("b", 2), Field::new("a", 3)],
            false,
        );
        assert_eq!(result, Err(InvariantError::DuplicateField("a".to_string())));
    }

    #[test]
    #[should_panic(expected = "duplicate field")]
    fn test_literal_panics_on_duplicates() {
        let _ = partial! { "a" => 1, "a" => 2 };
    }

    #[test]
    fn test_erase_removes_named_keys_only() {
        let pattern = partial! { "a" => WildcardKind::Any };
        let value = map(&[("a", Value::from(1)), ("b", Value::from(2))]);
        assert_eq!(pattern.erase(value), map(&[("b", Value::from(2))]));
    }

    #[test]
    fn test_erase_prunes_emptied_maps() {
        let pattern = partial! { "metadata" => partial! { "name" => WildcardKind::String } };
        let value = map(&[
            ("metadata", map(&[("name", Value::from("x"))])),
            ("spec", map(&[])),
        ]);
        assert_eq!(pattern.erase(value), map(&[("spec", map(&[]))]));
    }

    #[test]
    fn test_erase_everything_is_absent() {
        let pattern = exclusive! { "a" => 1 };
        assert_eq!(pattern.erase(map(&[("a", Value::from(1))])), Value::Absent);
    }

    #[test]
    fn test_write_into_absent_builds_map() {
        let pattern = partial! { "a" => partial! { "b" => "x" } };
        assert_eq!(
            pattern.write(Value::Absent).unwrap(),
            map(&[("a", map(&[("b", Value::from("x"))]))])
        );
    }

    #[test]
    fn test_write_merges_into_existing_map() {
        let pattern = partial! { "a" => partial! { "b" => "x" } };
        let value = map(&[("a", map(&[("c", Value::from(1))]))]);
        assert_eq!(
            pattern.write(value).unwrap(),
            map(&[("a", map(&[("c", Value::from(1)), ("b", Value::from("x"))]))])
        );
    }

    #[test]
    fn test_erase_then_write_restores_empty_map() {
        let pattern = partial! {
            "kind" => "Service",
            "spec" => partial! { "ports" => WildcardKind::Any },
        };
        let value = map(&[("kind", Value::from("Service")), ("spec", map(&[]))]);
        let template = pattern.matches(&value).to_template();
        let erased = pattern.erase(value.clone());
        assert!(erased.is_absent());
        assert_eq!(template.write(erased).unwrap(), value);
    }

    #[test]
    fn test_write_refuses_to_clobber() {
        let pattern = partial! { "a" => "new" };
        let error = pattern.write(map(&[("a", Value::from("old"))])).unwrap_err();
        assert_eq!(
            error,
            InvariantError::Overwrite {
                new: Value::from("new"),
                existing: Value::from("old"),
            }
        );
    }

    #[test]
    fn test_write_absent_constant_is_noop() {
        let pattern = partial! { "a" => Value::Absent };
        let value = map(&[("a", Value::from(1))]);
        assert_eq!(pattern.write(value.clone()).unwrap(), value);
        assert_eq!(pattern.write(Value::Absent).unwrap(), map(&[]));
    }

    #[test]
    fn test_write_fields_into_scalar_fails() {
        let pattern = partial! { "a" => 1 };
        assert_eq!(
            pattern.write(Value::from(3)),
            Err(InvariantError::ExpectedMapOrAbsent(Value::from(3)))
        );
    }

    #[test]
    fn test_write_wildcard_is_unbound() {
        assert_eq!(
            Pattern::any().write(Value::Absent),
            Err(InvariantError::UnboundWildcard)
        );
    }

    #[test]
    fn test_wildcard_path_prefers_first_field() {
        let pattern = partial! {
            "kind" => "Pod",
            "first" => partial! { "inner" => WildcardKind::Number },
            "second" => WildcardKind::Any,
        };
        assert_eq!(pattern.wildcard_path().unwrap(), ["first", "inner"]);
    }

    #[test]
    fn test_wildcard_path_requires_a_wildcard() {
        let pattern = partial! { "kind" => "Pod", "spec" => partial! { "a" => 1 } };
        assert_eq!(pattern.wildcard_path(), Err(InvariantError::NotATelescope));
        assert_eq!(Pattern::any().wildcard_path().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_set_const_replaces_leaf() {
        let mut pattern = partial! { "spec" => partial! { "ports" => WildcardKind::Any } };
        pattern.set_const(&["spec", "ports"], Value::from("http")).unwrap();
        assert_eq!(
            pattern,
            partial! { "spec" => partial! { "ports" => "http" } }
        );
    }

    #[test]
    fn test_set_const_path_errors() {
        let mut pattern = partial! { "spec" => partial! { "ports" => WildcardKind::Any } };
        assert!(matches!(
            pattern.set_const(&["spec"], Value::Null),
            Err(InvariantError::SetConstPath { reason: "path ends at a fields pattern", .. })
        ));
        assert!(matches!(
            pattern.set_const(&["spec", "ports", "deeper"], Value::Null),
            Err(InvariantError::SetConstPath { reason: "path runs past a leaf", .. })
        ));
        assert!(matches!(
            pattern.set_const(&["status"], Value::Null),
            Err(InvariantError::SetConstPath { reason: "no field with that name", .. })
        ));
    }

    #[test]
    fn test_extract_template() {
        let pattern = partial! { "kind" => "Service", "spec" => WildcardKind::Any };
        assert_eq!(
            pattern.extract(),
            map(&[("kind", Value::from("Service")), ("spec", Value::Absent)])
        );
    }
}
