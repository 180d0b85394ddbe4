//! Serialization of typed values back into raw trees
//!
//! This module defines the trait [`Represent`], the dual of construction
//! from a [`Raw`] tree, together with the per-call [`ReprOptions`] that
//! control how field keys are shaped in the output.
//!
//! Serialization walks an object graph in declaration order and emits one
//! entry per field that holds a value. Unset fields are omitted entirely, so
//! that absence in the input is absence in the output; a field that is set
//! to an empty composite still serializes to an empty mapping.
//!
//! The output is a tree of the same shape as construction input, and may be
//! fed back into [`Object::from_raw`] for the same type. When keys are
//! decorated with namespaces or attribute markers the round trip still
//! holds, because every decorated spelling is also an accepted alias.
//!
//! The sub-module [`key`] holds the key-shaping rules proper.

use crate::leaf::Leaf;
use crate::object::{Object, Value};
use crate::raw::{Mapping, Raw};
use crate::seq::SparseArray;

pub mod key;

pub use key::field_key;

/// Options controlling the keys emitted by [`Represent::to_representation`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReprOptions {
    /// Prefix attribute fields with the attribute marker
    pub attribute: bool,
    /// Qualify namespaced fields with their namespace
    pub namespace: bool,
    /// Emit [`Key::Symbol`](crate::raw::Key::Symbol) keys rather than
    /// [`Key::Str`](crate::raw::Key::Str)
    pub symbolic_keys: bool,
}

impl Default for ReprOptions {
    fn default() -> Self {
        Self {
            attribute: true,
            namespace: true,
            symbolic_keys: true,
        }
    }
}

impl ReprOptions {
    /// Options that emit bare canonical names as string keys
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            attribute: false,
            namespace: false,
            symbolic_keys: false,
        }
    }

    #[must_use]
    pub const fn attribute(self, attribute: bool) -> Self {
        Self { attribute, ..self }
    }

    #[must_use]
    pub const fn namespace(self, namespace: bool) -> Self {
        Self { namespace, ..self }
    }

    #[must_use]
    pub const fn symbolic_keys(self, symbolic_keys: bool) -> Self {
        Self {
            symbolic_keys,
            ..self
        }
    }
}

/// Trait for typed values that can be lowered into a generic [`Raw`] tree
///
/// Implementations must be structurally inductive: a composite value
/// represents each of its components with the same options it was given.
pub trait Represent {
    /// Produces the raw tree for this value, shaping keys according to `opts`
    fn to_representation(&self, opts: &ReprOptions) -> Raw;

    /// Shorthand for [`to_representation`](Represent::to_representation)
    /// with [`ReprOptions::default()`]
    fn to_hash(&self) -> Raw {
        self.to_representation(&ReprOptions::default())
    }
}

impl Represent for Leaf {
    fn to_representation(&self, _: &ReprOptions) -> Raw {
        Raw::Scalar(self.scalar().clone())
    }
}

impl Represent for SparseArray {
    fn to_representation(&self, opts: &ReprOptions) -> Raw {
        Raw::Sequence(
            self.iter()
                .map(|item| item.map_or(Raw::Null, |v| v.to_representation(opts)))
                .collect(),
        )
    }
}

impl Represent for Value {
    fn to_representation(&self, opts: &ReprOptions) -> Raw {
        match self {
            Value::Leaf(leaf) => leaf.to_representation(opts),
            Value::Object(obj) => obj.to_representation(opts),
            Value::Array(arr) => arr.to_representation(opts),
        }
    }
}

impl Represent for Object {
    fn to_representation(&self, opts: &ReprOptions) -> Raw {
        let def = self.object_type().definition();
        let mut out = Mapping::with_capacity(self.len());
        for (name, value) in self.iter() {
            if let Some(decl) = def.field(name) {
                out.insert(field_key(decl, opts), value.to_representation(opts));
            }
        }
        Raw::Mapping(out)
    }
}
