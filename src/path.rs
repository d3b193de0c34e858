//! Key-path navigation, insertion and pruning over [`Value`] trees.
//!
//! Paths are slices of map keys. Lookups borrow from the tree; edits take the
//! root by `&mut` so that an [`Value::Absent`] root can be replaced by a fresh
//! map.
//!
//! Split functions lean on these helpers to read captures and to build or
//! tear down nested structure without leaving empty maps behind.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use shorthand::path::{clean_path, dotted, insert_path, string_at};
//! use shorthand::value::Value;
//!
//! let mut manifest = Value::from(json!({"metadata": {"name": "pod1"}}));
//! assert_eq!(string_at(&manifest, &dotted("metadata.name")).unwrap(), "pod1");
//!
//! clean_path(&mut manifest, &["metadata", "name"]).unwrap();
//! assert_eq!(manifest, Value::from(json!({})));
//!
//! insert_path(&mut manifest, &["metadata", "labels", "app"], Value::from("web")).unwrap();
//! assert_eq!(manifest, Value::from(json!({"metadata": {"labels": {"app": "web"}}})));
//! ```

use crate::error::{PathError, Result, TransformError};
use crate::value::{Map, Value};

/// Splits a dotted path such as `"metadata.name"` into its segments.
pub fn dotted(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

/// Returns the value found by following `path` through nested maps.
///
/// An empty path returns `value` itself.
///
/// # Errors
///
/// - [`PathError::NoSuchKey`] if an intermediate value is not a map.
/// - [`PathError::MissingKey`] if a map has no entry for the next key.
pub fn at<'a, K: AsRef<str>>(value: &'a Value, path: &[K]) -> Result<&'a Value, PathError> {
    path.iter().try_fold(value, |current, key| {
        let key = key.as_ref();
        match current {
            Value::Map(map) => map
                .get(key)
                .ok_or_else(|| PathError::MissingKey(key.to_string())),
            _ => Err(PathError::NoSuchKey(key.to_string())),
        }
    })
}

fn mismatch(expected: &'static str, actual: &Value) -> PathError {
    PathError::TypeMismatch {
        expected,
        actual: actual.clone(),
    }
}

/// Like [`at`], but requires a string.
///
/// # Errors
///
/// Any error of [`at`], or [`PathError::TypeMismatch`].
pub fn string_at<'a, K: AsRef<str>>(value: &'a Value, path: &[K]) -> Result<&'a str, PathError> {
    let found = at(value, path)?;
    found.as_str().ok_or_else(|| mismatch("string", found))
}

/// Like [`at`], but requires a number.
///
/// # Errors
///
/// Any error of [`at`], or [`PathError::TypeMismatch`].
pub fn float_at<K: AsRef<str>>(value: &Value, path: &[K]) -> Result<f64, PathError> {
    let found = at(value, path)?;
    found.as_f64().ok_or_else(|| mismatch("number", found))
}

/// Like [`at`], but requires a map.
///
/// # Errors
///
/// Any error of [`at`], or [`PathError::TypeMismatch`].
pub fn map_at<'a, K: AsRef<str>>(value: &'a Value, path: &[K]) -> Result<&'a Map, PathError> {
    let found = at(value, path)?;
    found.as_map().ok_or_else(|| mismatch("map", found))
}

/// Like [`at`], but requires a list.
///
/// # Errors
///
/// Any error of [`at`], or [`PathError::TypeMismatch`].
pub fn slice_at<'a, K: AsRef<str>>(value: &'a Value, path: &[K]) -> Result<&'a [Value], PathError> {
    let found = at(value, path)?;
    found.as_list().ok_or_else(|| mismatch("list", found))
}

/// Returns `true` if there is a string at `path` equal to `expected`.
pub fn match_string_at<K: AsRef<str>>(value: &Value, path: &[K], expected: &str) -> bool {
    string_at(value, path).is_ok_and(|found| found == expected)
}

/// Inserts `inserted` at `path`, creating empty maps for missing segments.
///
/// An absent root becomes a new map. An empty path writes the root itself,
/// which must then be absent.
///
/// # Errors
///
/// - [`PathError::AlreadyPresent`] if the terminal key already holds a value.
/// - [`PathError::NotAMap`] if the path runs through a scalar or list.
pub fn insert_path<K: AsRef<str>>(
    root: &mut Value,
    path: &[K],
    inserted: Value,
) -> Result<(), PathError> {
    let Some((last, parents)) = path.split_last() else {
        if root.is_absent() {
            *root = inserted;
            return Ok(());
        }
        return Err(PathError::AlreadyPresent {
            key: String::new(),
            existing: root.clone(),
        });
    };

    let mut current = root;
    for key in parents {
        current = descend_or_create(current, key.as_ref())?;
    }

    let map = open_map(current)?;
    let key = last.as_ref();
    match map.get(key) {
        Some(existing) if !existing.is_absent() => Err(PathError::AlreadyPresent {
            key: key.to_string(),
            existing: existing.clone(),
        }),
        _ => {
            map.insert(key.to_string(), inserted);
            Ok(())
        }
    }
}

fn open_map(value: &mut Value) -> Result<&mut Map, PathError> {
    if value.is_absent() {
        *value = Value::Map(Map::new());
    }
    match value {
        Value::Map(map) => Ok(map),
        other => Err(PathError::NotAMap(other.clone())),
    }
}

fn descend_or_create<'a>(value: &'a mut Value, key: &str) -> Result<&'a mut Value, PathError> {
    Ok(open_map(value)?
        .entry(key.to_string())
        .or_insert(Value::Absent))
}

/// Deletes the value at `path`, then deletes every ancestor map the deletion
/// left empty.
///
/// The root itself is never removed; it may be left as an empty map. Missing
/// keys are not an error: there is nothing to clean.
///
/// # Errors
///
/// [`PathError::NotAMap`] if the path runs through a scalar or list.
pub fn clean_path<K: AsRef<str>>(root: &mut Value, path: &[K]) -> Result<(), PathError> {
    if path.is_empty() {
        return Ok(());
    }
    clean(root, path).map(|_| ())
}

/// Returns `true` when `value` became an empty map and should be deleted from its parent.
fn clean<K: AsRef<str>>(value: &mut Value, path: &[K]) -> Result<bool, PathError> {
    let Value::Map(map) = value else {
        return Err(PathError::NotAMap(value.clone()));
    };
    let Some((first, rest)) = path.split_first() else {
        return Ok(false);
    };
    let key = first.as_ref();
    let Some(child) = map.get_mut(key) else {
        return Ok(false);
    };

    let delete_child = rest.is_empty() || clean(child, rest)?;
    if delete_child {
        map.shift_remove(key);
        return Ok(map.is_empty());
    }
    Ok(false)
}

/// The transform that returns its input unchanged.
///
/// # Errors
///
/// Never fails.
pub fn identity_transform(value: &Value) -> Result<Value> {
    Ok(value.clone())
}

/// Lifts `transform` to apply to every element of a list.
///
/// Elements the transform rejects are kept unchanged. The lifted transform
/// fails only when every element fails, reporting the first failure; an empty
/// list succeeds. A fatal error from any element is returned at once.
pub fn multiply_transform<F>(transform: F) -> impl Fn(&Value) -> Result<Value> + Send + Sync
where
    F: Fn(&Value) -> Result<Value> + Send + Sync,
{
    move |value: &Value| {
        let Value::List(elements) = value else {
            return Err(TransformError::ExpectedList(value.clone()));
        };

        let mut transformed = Vec::with_capacity(elements.len());
        let mut failures = Vec::new();
        for (index, element) in elements.iter().enumerate() {
            match transform(element) {
                Ok(next) => transformed.push(next),
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    tracing::trace!(index, %error, "element left unchanged");
                    failures.push(TaggedError { tag: index, error });
                    transformed.push(element.clone());
                }
            }
        }

        if !elements.is_empty() && failures.len() == elements.len() {
            if let Some(error) = merge_errors(failures) {
                return Err(error);
            }
        }
        Ok(Value::List(transformed))
    }
}

/// An error tagged with the position of the step or element that raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedError {
    /// Index of the failing step or element.
    pub tag: usize,
    /// The error it raised.
    pub error: TransformError,
}

/// Combines the errors of several failed steps into one.
///
/// Only the first error is kept; the rest are dropped. Returns `None` when
/// there is nothing to merge.
pub fn merge_errors(errors: Vec<TaggedError>) -> Option<TransformError> {
    errors.into_iter().next().map(|tagged| tagged.error)
}
