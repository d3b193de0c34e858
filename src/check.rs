//! Round-trip verification of isos against concrete documents.
//!
//! [`round_trip`] renders a document, views it forward, renders it again,
//! views the result backward and renders a third time. The iso passes only if
//! the first and last renderings are identical text.
//!
//! Renderings are canonical JSON with sorted keys, so reordering of keys by
//! erase and write never counts as a difference.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use shorthand::check::round_trip;
//! use shorthand::optics::Iso;
//! use shorthand::value::Value;
//!
//! let document = Value::from(json!({"kind": "Pod", "metadata": {"name": "web"}}));
//! let report = round_trip(&document, &Iso::identity()).unwrap();
//! assert_eq!(report.pristine, report.reverted);
//! ```

use thiserror::Error;

use crate::error::TransformError;
use crate::optics::Iso;
use crate::value::Value;

/// Runtime settings for the round-trip checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    pretty: bool,
    fail_fast: bool,
}

impl CheckOptions {
    /// Pretty rendering, no fail-fast.
    pub const fn new() -> Self {
        Self {
            pretty: true,
            fail_fast: false,
        }
    }

    /// Chooses between pretty and compact JSON renderings.
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Makes sequential batch checks stop at the first failing document.
    #[must_use]
    pub const fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Whether renderings are pretty-printed.
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Whether sequential batch checks stop at the first failure.
    pub const fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The three renderings of a successful round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
    /// The document as given.
    pub pristine: String,
    /// The document after the forward view.
    pub transformed: String,
    /// The transformed document after the backward view.
    pub reverted: String,
}

/// Why a round trip failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoundTripCause {
    /// A document could not be rendered.
    #[error("rendering failed: {0}")]
    Render(String),

    /// The forward view failed.
    #[error("forward view failed: {0}")]
    Forward(#[source] TransformError),

    /// The backward view failed.
    #[error("backward view failed: {0}")]
    Backward(#[source] TransformError),

    /// The reverted document differs from the pristine one.
    #[error("reverted document differs from the pristine document")]
    Mismatch,
}

/// A failed round trip with every rendering produced before the failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed round trip: {cause}")]
pub struct RoundTripError {
    /// The document as given, if it could be rendered.
    pub pristine: Option<String>,
    /// The forward rendering, if the forward view succeeded.
    pub transformed: Option<String>,
    /// The backward rendering, if the backward view succeeded.
    pub reverted: Option<String>,
    /// What went wrong.
    #[source]
    pub cause: RoundTripCause,
}

impl RoundTripError {
    /// Returns `true` if a view failed with a fatal error.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            &self.cause,
            RoundTripCause::Forward(error) | RoundTripCause::Backward(error) if error.is_fatal()
        )
    }
}

/// Renders a value the way the checker compares it.
///
/// # Errors
///
/// The serialiser's message if rendering fails.
pub fn render(value: &Value, options: &CheckOptions) -> Result<String, String> {
    let json = value.to_json();
    let rendered = if options.is_pretty() {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    rendered.map_err(|error| error.to_string())
}

/// Round-trips `document` through `iso` with default options.
///
/// # Errors
///
/// A [`RoundTripError`] carrying the renderings produced so far.
pub fn round_trip(document: &Value, iso: &Iso) -> Result<RoundTrip, RoundTripError> {
    round_trip_with(document, iso, &CheckOptions::default())
}

/// Round-trips `document` through `iso`.
///
/// # Errors
///
/// A [`RoundTripError`] carrying the renderings produced so far.
#[tracing::instrument(level = "debug", skip_all)]
pub fn round_trip_with(
    document: &Value,
    iso: &Iso,
    options: &CheckOptions,
) -> Result<RoundTrip, RoundTripError> {
    let mut failure = RoundTripError {
        pristine: None,
        transformed: None,
        reverted: None,
        cause: RoundTripCause::Mismatch,
    };
    let fail = |mut failure: RoundTripError, cause| {
        failure.cause = cause;
        tracing::debug!(cause = %failure.cause, "round trip failed");
        failure
    };

    let pristine = match render(document, options) {
        Ok(text) => text,
        Err(message) => return Err(fail(failure, RoundTripCause::Render(message))),
    };
    failure.pristine = Some(pristine.clone());

    let shrunk = match iso.forward().view(document) {
        Ok(shrunk) => shrunk,
        Err(error) => return Err(fail(failure, RoundTripCause::Forward(error))),
    };
    let transformed = match render(&shrunk, options) {
        Ok(text) => text,
        Err(message) => return Err(fail(failure, RoundTripCause::Render(message))),
    };
    failure.transformed = Some(transformed.clone());

    let grown = match iso.backward().view(&shrunk) {
        Ok(grown) => grown,
        Err(error) => return Err(fail(failure, RoundTripCause::Backward(error))),
    };
    let reverted = match render(&grown, options) {
        Ok(text) => text,
        Err(message) => return Err(fail(failure, RoundTripCause::Render(message))),
    };

    if pristine != reverted {
        failure.reverted = Some(reverted);
        return Err(fail(failure, RoundTripCause::Mismatch));
    }

    tracing::debug!("round trip succeeded");
    Ok(RoundTrip {
        pristine,
        transformed,
        reverted,
    })
}

/// Round-trips every document through `iso`, returning one outcome per
/// document in input order.
///
/// With the `rayon` feature documents are checked in parallel and
/// [`CheckOptions::fail_fast`] is ignored. Without it, a fail-fast check
/// stops after the first failure and returns only the outcomes so far.
pub fn check_documents(
    documents: &[Value],
    iso: &Iso,
    options: &CheckOptions,
) -> Vec<Result<RoundTrip, RoundTripError>> {
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;

        documents
            .par_iter()
            .map(|document| round_trip_with(document, iso, options))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    {
        let mut outcomes = Vec::with_capacity(documents.len());
        for document in documents {
            let outcome = round_trip_with(document, iso, options);
            let failed = outcome.is_err();
            outcomes.push(outcome);
            if failed && options.is_fail_fast() {
                break;
            }
        }
        outcomes
    }
}
