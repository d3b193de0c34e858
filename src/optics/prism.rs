//! Prisms: single invertible rewrite steps over [`Value`] trees.
//!
//! A [`Prism`] pairs a template [`Pattern`] with a split function. Viewing a
//! value through it:
//!
//! 1. matches the template against the value,
//! 2. hands the captures to the split function, which returns a write
//!    template describing the new shape,
//! 3. erases everything the template matched,
//! 4. writes the new shape into what remains.
//!
//! A failed match or a split that declines the captures is an ordinary,
//! recoverable error. A failed write is fatal: the split produced a shape
//! that collides with data the template left behind, which is a bug in the
//! prism rather than a property of the input.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use shorthand::optics::Prism;
//! use shorthand::pattern::WildcardKind;
//! use shorthand::{partial, value::Value};
//!
//! // {"metadata": {"name": x}} becomes {"name": x}
//! let hoist_name = Prism::new(
//!     partial! { "metadata" => partial! { "name" => WildcardKind::String } },
//!     |matched| {
//!         let captured = matched.extract();
//!         let name = shorthand::path::string_at(&captured, &["metadata", "name"])?;
//!         Ok(partial! { "name" => name })
//!     },
//! );
//!
//! let pod = Value::from(json!({"metadata": {"name": "pod1"}, "spec": {}}));
//! let short = hoist_name.view(&pod).unwrap();
//! assert_eq!(short, Value::from(json!({"name": "pod1", "spec": {}})));
//!
//! // Input without a name is left for another prism.
//! assert!(hoist_name.view(&Value::from(json!({"spec": {}}))).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TransformError};
use crate::path::{TaggedError, at, identity_transform, merge_errors, multiply_transform};
use crate::pattern::{Matched, Pattern};
use crate::value::Value;

/// A split function: turns the captures of a successful match into a write
/// template.
pub type SplitFunction = dyn Fn(&Matched<'_>) -> Result<Pattern> + Send + Sync;

/// A single rewrite step: match a template, erase it, write a new shape.
///
/// Prisms are immutable and cheap to clone; one prism may view any number of
/// values, from any number of threads.
#[derive(Clone)]
pub struct Prism {
    template: Pattern,
    split: Arc<SplitFunction>,
}

impl Prism {
    /// Creates a prism from a template and a split function.
    ///
    /// `split` receives the match result and returns the write template: a
    /// pattern of constants and fields describing exactly what to write in
    /// place of the erased input.
    pub fn new<F>(template: Pattern, split: F) -> Self
    where
        F: Fn(&Matched<'_>) -> Result<Pattern> + Send + Sync + 'static,
    {
        Self {
            template,
            split: Arc::new(split),
        }
    }

    /// The template this prism matches.
    pub const fn template(&self) -> &Pattern {
        &self.template
    }

    /// Views `value` through this prism, returning the rewritten value.
    ///
    /// The input is left untouched; the result is built from a copy taken
    /// once match and split have both succeeded.
    ///
    /// # Errors
    ///
    /// - [`TransformError::NoMatch`] if the template does not match.
    /// - Whatever the split function returns.
    /// - [`TransformError::Invariant`] if the write template collides with
    ///   the erased remainder. This one is fatal.
    pub fn view(&self, value: &Value) -> Result<Value> {
        let matched = self.template.matches(value);
        if let Some(no_match) = matched.no_match(value) {
            tracing::trace!(error = %no_match, "prism did not match");
            return Err(no_match.into());
        }

        let target = (self.split)(&matched)?;
        let remainder = self.template.erase(value.clone());
        target.write(remainder).map_err(|error| {
            tracing::error!(%error, "split produced a shape that collides with the erased input");
            TransformError::Invariant(error)
        })
    }

    /// The prism that returns every value unchanged.
    pub fn identity() -> Self {
        Self::from_transform(identity_transform)
    }

    /// Lifts a plain value transform into a prism over any value.
    pub fn from_transform<F>(transform: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(Pattern::any(), move |matched| {
            transform(&matched.extract()).map(Pattern::Constant)
        })
    }

    /// Chains prisms, feeding each one the result of the previous.
    ///
    /// A step that fails is skipped and its input passed on unchanged. The
    /// sequence fails only when every step fails, with the first step's
    /// error; a fatal error from any step is returned at once. An empty
    /// sequence is [`Prism::identity`].
    pub fn sequence(prisms: impl IntoIterator<Item = Self>) -> Self {
        let steps: Vec<Self> = prisms.into_iter().collect();
        if steps.is_empty() {
            return Self::identity();
        }

        Self::from_transform(move |value| {
            let mut current = value.clone();
            let mut failures = Vec::new();
            for (index, step) in steps.iter().enumerate() {
                match step.view(&current) {
                    Ok(next) => current = next,
                    Err(error) if error.is_fatal() => return Err(error),
                    Err(error) => {
                        tracing::trace!(step = index, %error, "sequence step skipped");
                        failures.push(TaggedError { tag: index, error });
                    }
                }
            }

            if failures.len() == steps.len() {
                if let Some(error) = merge_errors(failures) {
                    return Err(error);
                }
            }
            Ok(current)
        })
    }

    /// Applies a prism to every element of a list.
    ///
    /// Elements the prism rejects are kept unchanged. Fails only when every
    /// element fails or the value is not a list.
    pub fn multiply(prism: Self) -> Self {
        Self::from_transform(multiply_transform(move |element| prism.view(element)))
    }

    /// Focuses a prism on the value under a telescope's wildcard.
    ///
    /// The telescope is matched against the whole value; the value at its
    /// wildcard path is viewed through `prism` and written back at the same
    /// path, leaving everything else as it was.
    ///
    /// # Errors
    ///
    /// [`InvariantError::NotATelescope`](crate::error::InvariantError::NotATelescope)
    /// if no field path of the telescope leads to a wildcard.
    pub fn zoom(telescope: Pattern, prism: Self) -> Result<Self> {
        let path = telescope.wildcard_path()?;
        Ok(Self::new(telescope, move |matched| {
            let captured = matched.extract();
            let focus = at(&captured, &path)?;
            let viewed = prism.view(focus)?;

            let mut target = matched.to_template();
            target.set_const(&path, viewed)?;
            Ok(target)
        }))
    }
}

static_assertions::assert_impl_all!(Prism: Send, Sync, Clone);

impl fmt::Debug for Prism {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Prism")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}
