//! Isos: pairs of prisms meant to undo each other.
//!
//! An [`Iso`] holds a forward prism (native format to shorthand) and a
//! backward prism (shorthand to native format). The combinators build larger
//! isos out of smaller ones while keeping the pair invertible.
//!
//! # Laws
//!
//! For every value the forward prism accepts:
//!
//! ```text
//! iso.backward().view(&iso.forward().view(&value)?)? == value
//! ```
//!
//! The engine does not check this; it is an obligation on whoever writes the
//! split and unsplit functions. [`round_trip`](crate::check::round_trip)
//! verifies it for concrete documents.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use shorthand::optics::Iso;
//! use shorthand::pattern::{Pattern, WildcardKind};
//! use shorthand::{exclusive, value::Value};
//!
//! // {"value": x} <-> x
//! let unwrap = Iso::new(
//!     exclusive! { "value" => WildcardKind::Any },
//!     Pattern::any(),
//!     |matched| {
//!         let inner = shorthand::path::at(&matched.extract(), &["value"])?.clone();
//!         Ok(Pattern::Constant(inner))
//!     },
//!     |matched| Ok(exclusive! { "value" => matched.extract() }),
//! );
//!
//! let wrapped = Value::from(json!({"value": [1, 2]}));
//! let short = unwrap.forward().view(&wrapped).unwrap();
//! assert_eq!(short, Value::from(json!([1, 2])));
//! assert_eq!(unwrap.backward().view(&short).unwrap(), wrapped);
//! ```

use crate::error::Result;
use crate::pattern::{Matched, Pattern};
use crate::value::Value;

use super::Prism;

/// A forward prism together with the backward prism that undoes it.
#[derive(Debug, Clone)]
pub struct Iso {
    forward: Prism,
    backward: Prism,
}

impl Iso {
    /// Builds an iso from a template and split function for each direction.
    ///
    /// The forward prism matches `from` and splits with `split`; the backward
    /// prism matches `to` and splits with `unsplit`.
    pub fn new<S, U>(from: Pattern, to: Pattern, split: S, unsplit: U) -> Self
    where
        S: Fn(&Matched<'_>) -> Result<Pattern> + Send + Sync + 'static,
        U: Fn(&Matched<'_>) -> Result<Pattern> + Send + Sync + 'static,
    {
        Self::from_prisms(Prism::new(from, split), Prism::new(to, unsplit))
    }

    /// Pairs two existing prisms.
    pub const fn from_prisms(forward: Prism, backward: Prism) -> Self {
        Self { forward, backward }
    }

    /// Pairs two plain value transforms.
    pub fn from_transforms<F, B>(forward: F, backward: B) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        B: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::from_prisms(
            Prism::from_transform(forward),
            Prism::from_transform(backward),
        )
    }

    /// The native-to-shorthand direction.
    pub const fn forward(&self) -> &Prism {
        &self.forward
    }

    /// The shorthand-to-native direction.
    pub const fn backward(&self) -> &Prism {
        &self.backward
    }

    /// Splits the iso into its two prisms.
    pub fn into_prisms(self) -> (Prism, Prism) {
        (self.forward, self.backward)
    }

    /// Swaps the two directions.
    #[must_use]
    pub fn flip(self) -> Self {
        Self::from_prisms(self.backward, self.forward)
    }

    /// The iso that changes nothing in either direction.
    pub fn identity() -> Self {
        Self::from_prisms(Prism::identity(), Prism::identity())
    }

    /// Chains isos.
    ///
    /// Forward applies the forward prisms in order; backward applies the
    /// backward prisms in reverse order, so the last step taken is the first
    /// undone. See [`Prism::sequence`] for how failing steps are handled.
    pub fn sequence(isos: impl IntoIterator<Item = Self>) -> Self {
        let (forwards, mut backwards): (Vec<Prism>, Vec<Prism>) =
            isos.into_iter().map(Self::into_prisms).unzip();
        backwards.reverse();
        Self::from_prisms(Prism::sequence(forwards), Prism::sequence(backwards))
    }

    /// Applies an iso to every element of a list, in both directions.
    pub fn multiply(iso: Self) -> Self {
        let (forward, backward) = iso.into_prisms();
        Self::from_prisms(Prism::multiply(forward), Prism::multiply(backward))
    }

    /// Focuses an iso on the value under a telescope's wildcard, in both
    /// directions.
    ///
    /// # Errors
    ///
    /// [`InvariantError::NotATelescope`](crate::error::InvariantError::NotATelescope)
    /// if no field path of the telescope leads to a wildcard.
    pub fn zoom(telescope: Pattern, iso: Self) -> Result<Self> {
        let (forward, backward) = iso.into_prisms();
        Ok(Self::from_prisms(
            Prism::zoom(telescope.clone(), forward)?,
            Prism::zoom(telescope, backward)?,
        ))
    }
}

static_assertions::assert_impl_all!(Iso: Send, Sync);
