//! Prisms and isos over decoded documents.
//!
//! This module provides the composable rewrite steps of the engine. A
//! [`Prism`] is one step: it matches a [`Pattern`](crate::pattern::Pattern),
//! erases what it matched and writes a new shape built from the captures. An
//! [`Iso`] pairs a forward prism with the backward prism that undoes it.
//!
//! # Combinators
//!
//! | Combinator | Prism | Iso |
//! |---|---|---|
//! | identity | [`Prism::identity`] | [`Iso::identity`] |
//! | chain steps | [`Prism::sequence`] | [`Iso::sequence`] (backward runs in reverse) |
//! | every list element | [`Prism::multiply`] | [`Iso::multiply`] |
//! | focus on a nested value | [`Prism::zoom`] | [`Iso::zoom`] |
//!
//! `sequence` and `multiply` are permissive: they fail only when every step
//! or element fails, and keep whatever succeeded otherwise.
//!
//! # Round-trip Law
//!
//! ```text
//! iso.backward().view(&iso.forward().view(&document)?)? == document
//! ```
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use shorthand::optics::Iso;
//! use shorthand::partial;
//! use shorthand::pattern::{Pattern, WildcardKind};
//! use shorthand::value::Value;
//!
//! // Shorten {"replicas": n} to {"r": n} inside any Deployment's spec.
//! let short_replicas = Iso::new(
//!     partial! { "replicas" => WildcardKind::Number },
//!     partial! { "r" => WildcardKind::Number },
//!     |matched| {
//!         let replicas = shorthand::path::at(&matched.extract(), &["replicas"])?.clone();
//!         Ok(partial! { "r" => replicas })
//!     },
//!     |matched| {
//!         let replicas = shorthand::path::at(&matched.extract(), &["r"])?.clone();
//!         Ok(partial! { "replicas" => replicas })
//!     },
//! );
//! let telescope = partial! { "kind" => "Deployment", "spec" => WildcardKind::Any };
//! let iso = Iso::zoom(telescope, short_replicas).unwrap();
//!
//! let deployment = Value::from(json!({"kind": "Deployment", "spec": {"replicas": 3}}));
//! let short = iso.forward().view(&deployment).unwrap();
//! assert_eq!(short, Value::from(json!({"kind": "Deployment", "spec": {"r": 3}})));
//! assert_eq!(iso.backward().view(&short).unwrap(), deployment);
//! ```

mod iso;
mod prism;

pub use iso::Iso;

pub use prism::Prism;
pub use prism::SplitFunction;
