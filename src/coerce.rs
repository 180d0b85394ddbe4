//! Conversion of raw or typed input into declared field types
//!
//! Every assignment to a field, whether through an explicit setter, through
//! construction from a raw mapping, or through materialization of a default,
//! passes through the functions in this module.
//!
//! The rules, for a declared type `T`:
//!
//!   * a typed value that is already an instance of `T` is returned unchanged;
//!   * null and the empty string coerce to absence;
//!   * a raw scalar is parsed by `T`, if `T` is a leaf type;
//!   * any other raw value constructs a new object of `T`, if `T` is composite,
//!     recursively coercing each of its fields;
//!   * a typed value of some other type is lowered to its representation
//!     and coerced from that.

use crate::conv::Represent;
use crate::error::{Error, Result};
use crate::leaf::Leaf;
use crate::object::{Object, Value};
use crate::raw::{Mapping, Raw, Scalar};
use crate::registry::TypeRef;
use crate::seq::SparseArray;
use num_bigint::BigInt;

/// Value accepted by field setters: either a raw tree or an already-typed value
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Raw(Raw),
    Typed(Value),
}

impl Input {
    /// Lowers the input into a raw tree, serializing typed values with
    /// default options.
    #[must_use]
    pub fn into_raw(self) -> Raw {
        match self {
            Input::Raw(raw) => raw,
            Input::Typed(v) => v.to_hash(),
        }
    }
}

impl From<Raw> for Input {
    fn from(raw: Raw) -> Self {
        Input::Raw(raw)
    }
}

impl From<Value> for Input {
    fn from(v: Value) -> Self {
        Input::Typed(v)
    }
}

impl From<Object> for Input {
    fn from(obj: Object) -> Self {
        Input::Typed(Value::Object(obj))
    }
}

impl From<SparseArray> for Input {
    fn from(arr: SparseArray) -> Self {
        Input::Typed(Value::Array(arr))
    }
}

impl From<Leaf> for Input {
    fn from(leaf: Leaf) -> Self {
        Input::Typed(Value::Leaf(leaf))
    }
}

impl From<Mapping> for Input {
    fn from(m: Mapping) -> Self {
        Input::Raw(Raw::Mapping(m))
    }
}

impl<T: Into<Raw>> From<Vec<T>> for Input {
    fn from(v: Vec<T>) -> Self {
        Input::Raw(Raw::sequence(v))
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(val: Option<T>) -> Self {
        val.map_or(Input::Raw(Raw::Null), Into::into)
    }
}

macro_rules! input_from_raw {
    ( $( $t:ty ),+ ) => {
        $(
            impl From<$t> for Input {
                fn from(val: $t) -> Self {
                    Input::Raw(Raw::from(val))
                }
            }
        )+
    };
}

input_from_raw!(
    Scalar, bool, f64, &str, String, i8, i16, i32, i64, u8, u16, u32, u64, usize, BigInt
);

/// Coerces an input into a value of type `ty`, as for a non-array field.
///
/// Returns `Ok(None)` when the input coerces to absence.
pub fn coerce_scalar(input: Input, ty: &TypeRef) -> Result<Option<Value>> {
    match input {
        Input::Typed(v) if v.is_instance_of(ty) => Ok(Some(v)),
        Input::Typed(v) => coerce_scalar_raw(&v.to_hash(), ty),
        Input::Raw(raw) => coerce_scalar_raw(&raw, ty),
    }
}

/// Coerces a borrowed raw value into a value of type `ty`, as for a non-array field.
pub fn coerce_scalar_raw(raw: &Raw, ty: &TypeRef) -> Result<Option<Value>> {
    if raw.is_absent() {
        return Ok(None);
    }
    tracing::trace!(target_type = %ty.name(), "coercing raw value");
    match ty {
        TypeRef::Leaf(kind) => match raw {
            Raw::Scalar(s) => Ok(Some(Value::Leaf(Leaf::parse(kind, s)?))),
            other => Err(Error::InvalidInputShape {
                type_name: kind.name().to_owned(),
                value: other.clone(),
            }),
        },
        TypeRef::Object(ot) => Ok(Some(Value::Object(Object::from_raw(*ot, raw)?))),
    }
}

/// Coerces an input into a sparse array with elements of type `elem`, as for an array field.
///
/// A typed array whose element type is already `elem` is returned unchanged.
/// Otherwise a fresh array is created and the input merged into it.
pub fn coerce_array(input: Input, elem: &TypeRef) -> Result<SparseArray> {
    match input {
        Input::Typed(Value::Array(arr)) if arr.element_type() == elem => Ok(arr),
        other => {
            let mut arr = SparseArray::new(elem.clone());
            arr.merge(other)?;
            Ok(arr)
        }
    }
}

/// Borrowing variant of [`coerce_array`] for raw input
pub fn coerce_array_raw(raw: &Raw, elem: &TypeRef) -> Result<SparseArray> {
    let mut arr = SparseArray::new(elem.clone());
    arr.merge_raw(raw)?;
    Ok(arr)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::leaf::{Integer, Text};
    use crate::raw_map;
    use crate::registry::{Declared, FieldOptions, ObjectType};

    #[test]
    fn absent_inputs() {
        let ty = Text.type_ref();
        assert_eq!(coerce_scalar(Input::from(Raw::Null), &ty), Ok(None));
        assert_eq!(coerce_scalar(Input::from(""), &ty), Ok(None));
        assert_eq!(coerce_scalar(Input::from(None::<i64>), &ty), Ok(None));
    }

    #[test]
    fn identity_short_circuit() {
        let ty = Integer.type_ref();
        let v = coerce_scalar(Input::from("12"), &ty).unwrap().unwrap();
        let again = coerce_scalar(Input::Typed(v.clone()), &ty).unwrap().unwrap();
        assert_eq!(again, v);
    }

    #[test]
    fn foreign_typed_value_is_lowered() {
        let as_text = coerce_scalar(Input::from(5), &Text.type_ref())
            .unwrap()
            .unwrap();
        let as_int = coerce_scalar(Input::Typed(as_text), &Integer.type_ref())
            .unwrap()
            .unwrap();
        assert_eq!(as_int.as_leaf().and_then(Leaf::as_i64), Some(5));
    }

    #[test]
    fn leaf_rejects_structures() {
        let input = Input::from(raw_map! { "a" => 1 });
        let err = coerce_scalar(input, &Text.type_ref()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInputShape { ref type_name, .. } if type_name == "string"
        ));
    }

    #[test]
    fn nested_object() {
        let ty = ObjectType::declare("CoerceNested");
        ty.scalar("n", Integer, FieldOptions::new());
        let v = coerce_scalar(Input::from(raw_map! { "n" => "3" }), &ty.type_ref())
            .unwrap()
            .unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.object_type(), ty);
        assert_eq!(obj.peek("n").and_then(Value::as_leaf).and_then(Leaf::as_i64), Some(3));
    }

    #[test]
    fn subtype_instance_accepted_as_is() {
        let base = ObjectType::declare("CoerceBase");
        base.scalar("id", Integer, FieldOptions::new());
        let sub = base.subtype("CoerceSub");
        sub.scalar("extra", Text, FieldOptions::new());
        let obj = Object::from_raw(sub, &raw_map! { "id" => 1, "extra" => "x" }).unwrap();
        let v = coerce_scalar(Input::from(obj.clone()), &base.type_ref())
            .unwrap()
            .unwrap();
        assert_eq!(v.as_object(), Some(&obj));
    }

    #[test]
    fn array_identity_and_merge() {
        let elem = Text.type_ref();
        let arr = coerce_array(Input::from(vec!["a", "b"]), &elem).unwrap();
        assert_eq!(arr.len(), 2);
        let same = coerce_array(Input::from(arr.clone()), &elem).unwrap();
        assert_eq!(same, arr);
        let empty = coerce_array(Input::from(Raw::Null), &elem).unwrap();
        assert!(empty.is_empty());
    }
}
