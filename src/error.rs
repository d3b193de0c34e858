//! Error types for the transformation engine.
//!
//! Errors fall into two disjoint classes:
//!
//! - **Recoverable** errors describe data that a rule does not apply to: a
//!   pattern that did not match, a missing key, a split function rejecting its
//!   captures. Callers routinely try several candidate prisms and keep the
//!   first that succeeds.
//! - **Fatal** errors ([`TransformError::Invariant`]) mean a prism or iso was
//!   constructed inconsistently. They are never produced by bad input alone and
//!   the caller should abort the operation rather than retry.
//!
//! # Examples
//!
//! ```rust
//! use shorthand::error::{InvariantError, PathError, TransformError};
//!
//! let missing = TransformError::from(PathError::MissingKey("name".to_string()));
//! assert!(!missing.is_fatal());
//!
//! let broken = TransformError::from(InvariantError::UnboundWildcard);
//! assert!(broken.is_fatal());
//! ```

use thiserror::Error;

use crate::pattern::{Pattern, WildcardKind};
use crate::value::Value;

/// Convenience alias used throughout the crate.
pub type Result<T, E = TransformError> = std::result::Result<T, E>;

/// Failure to navigate or edit a value tree by key path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// An intermediate value on the path is not a map, so `key` cannot be looked up.
    #[error("no such key {0:?}: parent is not a map")]
    NoSuchKey(String),

    /// The parent is a map but has no entry for the key.
    #[error("missing key {0:?}")]
    MissingKey(String),

    /// The value at the end of the path has the wrong shape.
    #[error("expected {expected} but found {actual}")]
    TypeMismatch {
        /// Name of the expected shape (`"string"`, `"number"`, ...).
        expected: &'static str,
        /// The value actually found.
        actual: Value,
    },

    /// The terminal key already holds a value; inserts never overwrite.
    #[error("refusing to overwrite {key:?}, which already holds {existing}")]
    AlreadyPresent {
        /// The terminal key.
        key: String,
        /// The value that is already present.
        existing: Value,
    },

    /// An insert or delete had to descend into something that is not a map.
    #[error("cannot descend into {0}: not a map")]
    NotAMap(Value),
}

/// A local mismatch recorded while matching a single pattern node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// A constant pattern met a different value.
    #[error("expected constant {expected} but found {actual}")]
    ConstantMismatch {
        /// The constant of the pattern.
        expected: Value,
        /// The captured value.
        actual: Value,
    },

    /// A typed wildcard met a value of another shape.
    #[error("expected a {kind} wildcard but found {actual}")]
    WildcardType {
        /// The wildcard kind.
        kind: WildcardKind,
        /// The captured value.
        actual: Value,
    },

    /// A fields pattern met something other than a map.
    #[error("expected a map but found {0}")]
    ExpectedMap(Value),

    /// An exclusive fields pattern met keys it does not name.
    #[error("unexpected keys {0:?}")]
    UnexpectedKeys(Vec<String>),
}

/// Details of a failed match, kept boxed inside [`TransformError::NoMatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct NoMatchError {
    /// The template that was matched.
    pub pattern: Pattern,
    /// The value it was matched against.
    pub input: Value,
    /// Field names leading to the first failing node.
    pub path: Vec<String>,
    /// The first local mismatch.
    pub reason: MatchError,
}

impl std::fmt::Display for NoMatchError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(formatter, "failed match at root: {}", self.reason)
        } else {
            write!(
                formatter,
                "failed match at {}: {}",
                self.path.join("."),
                self.reason
            )
        }
    }
}

/// An internal inconsistency in how a prism or iso was put together.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantError {
    /// A write would have replaced an existing value.
    #[error("attempted to overwrite {existing} with {new}")]
    Overwrite {
        /// The value the pattern tried to write.
        new: Value,
        /// The value already in the slot.
        existing: Value,
    },

    /// A fields pattern was written into a scalar or list.
    #[error("expected a map or an absent slot but found {0}")]
    ExpectedMapOrAbsent(Value),

    /// A wildcard with nothing bound to it was used as a write template.
    #[error("cannot write a wildcard that holds no capture")]
    UnboundWildcard,

    /// A telescope pattern has no wildcard leaf to focus on.
    #[error("pattern is not a telescope: no field path leads to a wildcard")]
    NotATelescope,

    /// `set_const` could not follow its path to a leaf.
    #[error("cannot set constant at {}: {reason}", .path.join("."))]
    SetConstPath {
        /// The requested path.
        path: Vec<String>,
        /// Why the path did not resolve.
        reason: &'static str,
    },

    /// Two fields of one fields pattern share a name.
    #[error("duplicate field {0:?} in fields pattern")]
    DuplicateField(String),
}

/// The error type of every fallible transformation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The prism's template did not match the input.
    #[error("{0}")]
    NoMatch(Box<NoMatchError>),

    /// A path lookup or edit failed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A split or unsplit function declined the captured data.
    #[error("rejected: {0}")]
    Rejected(String),

    /// A list-only combinator met something else.
    #[error("expected a list but found {0}")]
    ExpectedList(Value),

    /// The prism or iso is internally inconsistent. Fatal.
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantError),
}

impl TransformError {
    /// Creates a [`TransformError::Rejected`] from any message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Returns `true` for errors that indicate a construction bug rather than
    /// unsuitable data.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

impl From<NoMatchError> for TransformError {
    fn from(error: NoMatchError) -> Self {
        Self::NoMatch(Box::new(error))
    }
}
