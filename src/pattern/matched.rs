//! Per-match results.

use crate::error::{MatchError, NoMatchError, PathError};
use crate::value::Value;

use super::{Fields, Pattern};

static ABSENT: Value = Value::Absent;

/// The result of matching one [`Pattern`] against one value.
///
/// A `Matched` mirrors the structure of its pattern: one node per pattern
/// node, each holding what was captured there and any local error. It borrows
/// the pattern, never the matched value.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched<'p> {
    pattern: &'p Pattern,
    capture: Option<Value>,
    error: Option<MatchError>,
    children: Vec<Matched<'p>>,
}

impl<'p> Matched<'p> {
    /// Creates an unmatched result tree for `pattern`.
    pub fn new(pattern: &'p Pattern) -> Self {
        let children = match pattern {
            Pattern::Fields(fields) => fields
                .fields
                .iter()
                .map(|field| Matched::new(&field.pattern))
                .collect(),
            Pattern::Constant(_) | Pattern::Wildcard(_) => Vec::new(),
        };
        Self {
            pattern,
            capture: None,
            error: None,
            children,
        }
    }

    /// The pattern this result belongs to.
    pub const fn pattern(&self) -> &'p Pattern {
        self.pattern
    }

    /// The value captured at this node, if it has been matched.
    ///
    /// Fields nodes only keep their input when it was not a map.
    pub const fn capture(&self) -> Option<&Value> {
        self.capture.as_ref()
    }

    /// The local error of this node.
    pub const fn error(&self) -> Option<&MatchError> {
        self.error.as_ref()
    }

    /// Resets every capture and error, returning the tree to its unmatched state.
    pub fn clear(&mut self) {
        self.capture = None;
        self.error = None;
        self.children.iter_mut().for_each(Self::clear);
    }

    /// Clears this result and matches the pattern against `value` again.
    pub fn rematch(&mut self, value: &Value) {
        self.clear();
        self.match_value(value);
    }

    fn match_value(&mut self, value: &Value) {
        match self.pattern {
            Pattern::Constant(expected) => {
                if value != expected {
                    self.error = Some(MatchError::ConstantMismatch {
                        expected: expected.clone(),
                        actual: value.clone(),
                    });
                }
                self.capture = Some(value.clone());
            }
            Pattern::Wildcard(kind) => {
                if !kind.accepts(value) {
                    self.error = Some(MatchError::WildcardType {
                        kind: *kind,
                        actual: value.clone(),
                    });
                }
                self.capture = Some(value.clone());
            }
            Pattern::Fields(fields) => match value {
                Value::Map(map) => {
                    for (field, child) in fields.fields.iter().zip(&mut self.children) {
                        child.match_value(map.get(&field.name).unwrap_or(&ABSENT));
                    }
                    if fields.exclusive {
                        let unexpected: Vec<String> = map
                            .keys()
                            .filter(|key| !fields.contains(key))
                            .cloned()
                            .collect();
                        if !unexpected.is_empty() {
                            self.error = Some(MatchError::UnexpectedKeys(unexpected));
                        }
                    }
                }
                other => {
                    self.error = Some(MatchError::ExpectedMap(other.clone()));
                    self.capture = Some(other.clone());
                }
            },
        }
    }

    /// Returns `true` if this node or any node below it recorded an error.
    pub fn has_errors(&self) -> bool {
        self.error.is_some() || self.children.iter().any(Self::has_errors)
    }

    /// The first error in field order, with the field names leading to it.
    pub fn first_error(&self) -> Option<(Vec<String>, &MatchError)> {
        if let Some(error) = &self.error {
            return Some((Vec::new(), error));
        }
        let Pattern::Fields(fields) = self.pattern else {
            return None;
        };
        fields
            .fields
            .iter()
            .zip(&self.children)
            .find_map(|(field, child)| {
                child.first_error().map(|(mut path, error)| {
                    path.insert(0, field.name.clone());
                    (path, error)
                })
            })
    }

    /// Describes a failed match for error reporting, or `None` if the match succeeded.
    pub(crate) fn no_match(&self, input: &Value) -> Option<NoMatchError> {
        self.first_error().map(|(path, reason)| NoMatchError {
            pattern: self.pattern.clone(),
            input: input.clone(),
            path,
            reason: reason.clone(),
        })
    }

    /// Projects the captures into a plain value.
    ///
    /// Fields nodes become maps of their fields' projections, absent entries
    /// included. Leaves yield their capture, or their literal content if they
    /// were never matched.
    pub fn extract(&self) -> Value {
        match (self.pattern, &self.capture) {
            (Pattern::Fields(_), Some(capture)) => capture.clone(),
            (Pattern::Fields(fields), None) => self.extract_fields(fields),
            (_, Some(capture)) => capture.clone(),
            (pattern, None) => pattern.extract(),
        }
    }

    fn extract_fields(&self, fields: &Fields) -> Value {
        fields
            .fields
            .iter()
            .zip(&self.children)
            .map(|(field, child)| (field.name.clone(), child.extract()))
            .collect()
    }

    /// Extracts the capture and requires it to be a string.
    ///
    /// # Errors
    ///
    /// [`PathError::TypeMismatch`] if the projection is not a string.
    pub fn extract_string(&self) -> Result<String, PathError> {
        match self.extract() {
            Value::String(string) => Ok(string),
            other => Err(PathError::TypeMismatch {
                expected: "string",
                actual: other,
            }),
        }
    }

    /// Freezes the captures into a write template with the same structure.
    ///
    /// Fields keep their names and exclusivity; every leaf becomes a constant
    /// holding its projection.
    pub fn to_template(&self) -> Pattern {
        match self.pattern {
            Pattern::Fields(fields) => Pattern::Fields(Fields {
                fields: fields
                    .fields
                    .iter()
                    .zip(&self.children)
                    .map(|(field, child)| super::Field {
                        name: field.name.clone(),
                        pattern: child.to_template(),
                    })
                    .collect(),
                exclusive: fields.exclusive,
            }),
            Pattern::Constant(_) | Pattern::Wildcard(_) => Pattern::Constant(self.extract()),
        }
    }
}
