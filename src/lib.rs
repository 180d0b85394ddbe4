//! Declarative object model for typed API messages
//!
//! # Overview
//!
//! This library provides the engine behind schema-driven message types for
//! remote APIs whose payloads arrive as semi-structured trees (XML parsed
//! into nested hashes, JSON parsed into nested maps). Rather than requiring
//! each message type to carry hand-written accessors, constructors, and
//! serializers, a schema author *declares* the fields of each type once, and
//! this crate supplies the rest:
//!
//!   * construction of typed objects from a raw tree, recursively coercing
//!     each entry into the declared type of the field it names
//!   * generic field access under every accepted spelling of a field's name
//!   * serialization of an object graph back into a raw tree, honoring the
//!     same key-shaping conventions the input used
//!
//! # Layout
//!
//! The crate is organized leaf-first:
//!
//!   * [`raw`] defines the generic intermediate tree, [`Raw`]
//!   * [`names`] holds the pure name-mapping functions from which field
//!     aliases and serialized keys are derived
//!   * [`leaf`] defines the scalar leaf types and the [`LeafKind`](leaf::LeafKind) trait
//!   * [`registry`] holds the per-type tables of field declarations, keyed by
//!     [`ObjectType`] handles
//!   * [`coerce`] converts raw or typed input into declared field types
//!   * [`seq`] defines the sparse array wrapper used by array fields
//!   * [`object`] defines typed [`Object`]s and the [`Value`]s they hold
//!   * [`conv`] defines [`Represent`], the serialization half of the model
//!
//! Schemas are most conveniently written with the [`message!`] macro, which
//! registers each declared type lazily on first use.
//!
//! # Keys and aliases
//!
//! Wire formats disagree on how a field's key is spelled: `errorCode` or
//! `error_code`, `amount` or `ebl:amount`, `currencyID` or `@currencyID`.
//! Every field is therefore reachable under its canonical name, its
//! separated-lowercase form, and (as declared) its namespace-qualified and
//! attribute-marked forms. All spellings resolve to one storage slot.
//!
//! # Inheritance
//!
//! A type may be declared as a subtype of another. The subtype starts from a
//! snapshot of its supertype's fields at the moment of subtyping, and fields
//! later added to the supertype are not visible to it.

pub mod coerce;
pub mod conv;
pub mod error;
pub mod leaf;
mod macros;
pub mod names;
pub mod object;
pub mod prelude;
pub mod raw;
pub mod registry;
pub mod seq;

#[cfg(feature = "serde_impls")]
pub mod serde_impls;

#[doc(hidden)]
pub use ::lazy_static::lazy_static;

pub use crate::coerce::Input;
pub use crate::conv::{ReprOptions, Represent};
pub use crate::error::{Error, LeafError, Result};
pub use crate::leaf::{Boolean, Float, Integer, Leaf, LeafKind, Text};
pub use crate::object::{Object, Value};
pub use crate::raw::{Key, Mapping, Raw, Scalar};
pub use crate::registry::{Declared, FieldOptions, ObjectType, TypeRef, CONTENT_KEY};
pub use crate::seq::SparseArray;
