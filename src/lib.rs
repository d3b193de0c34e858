//! # shorthand
//!
//! A pattern-driven engine for rewriting decoded configuration documents
//! (JSON, YAML and the like) into a shorter, hand-writable form and back.
//!
//! ## Overview
//!
//! Documents are [`Value`](value::Value) trees. A rewrite is built from:
//!
//! - **Patterns**: constants, typed wildcards and field sets that match,
//!   erase and write parts of a tree
//! - **Prisms**: one step that matches a template, erases it and writes a
//!   new shape built from the captures
//! - **Isos**: a forward prism with the backward prism that undoes it, plus
//!   the `sequence`, `multiply` and `zoom` combinators
//! - **Paths**: key-path lookups, clobber-free insertion and pruning
//! - **Checking**: round-trip verification of an iso on real documents
//!
//! ## Feature Flags
//!
//! - `serde` (default): conversions to and from `serde_json`, `Serialize` /
//!   `Deserialize` for [`Value`](value::Value) and the [`check`] module
//! - `rayon`: parallel batch checking in [`check::check_documents`]
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use shorthand::prelude::*;
//!
//! // {"image": x} <-> x
//! let image = Iso::new(
//!     exclusive! { "image" => WildcardKind::String },
//!     Pattern::wildcard(WildcardKind::String),
//!     |matched| Ok(Pattern::constant(string_at(&matched.extract(), &["image"])?)),
//!     |matched| Ok(exclusive! { "image" => matched.extract_string()? }),
//! );
//!
//! let container: Value = [("image".to_string(), Value::from("nginx"))].into_iter().collect();
//! let short = image.forward().view(&container).unwrap();
//! assert_eq!(short, Value::from("nginx"));
//! assert_eq!(image.backward().view(&short).unwrap(), container);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the types and helpers most split functions need.
///
/// # Usage
///
/// ```rust
/// use shorthand::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{
        InvariantError, MatchError, NoMatchError, PathError, Result, TransformError,
    };
    pub use crate::optics::{Iso, Prism};
    pub use crate::path::{
        at, clean_path, dotted, float_at, insert_path, map_at, match_string_at, slice_at,
        string_at,
    };
    pub use crate::pattern::{Field, Fields, Matched, Pattern, WildcardKind};
    pub use crate::value::{Map, Value};
    pub use crate::{exclusive, partial};

    #[cfg(feature = "serde")]
    pub use crate::check::{CheckOptions, RoundTrip, RoundTripError, round_trip};
}

pub mod error;
pub mod optics;
pub mod path;
pub mod pattern;
pub mod value;

#[cfg(feature = "serde")]
pub mod check;
