//! Typed objects and the values they hold
//!
//! An [`Object`] is an instance of a composite type declared in the
//! [registry](crate::registry). It owns one slot per declared field, each of
//! which is initialized lazily, and exposes every field under all of its
//! accepted spellings through a single pair of generic accessors,
//! [`get`](Object::get) and [`set`](Object::set).
//!
//! # Defaults
//!
//! Reading a field that was never assigned materializes its default by
//! assigning the type's empty default through the ordinary setter path:
//!
//!   * an empty [`SparseArray`] for array fields
//!   * an empty object for non-array composite fields
//!   * absence for non-array leaf fields
//!
//! [`peek`](Object::peek) offers a read that never materializes anything.
//!
//! # Construction
//!
//! [`Object::from_raw`] accepts a keyed mapping, assigning each entry in the
//! input's own order to the field its key spells, or, for content types, a
//! bare value assigned to the content field. Construction either succeeds
//! entirely or reports the first failure; no partially-built object is
//! returned.

use crate::coerce::{coerce_array, coerce_array_raw, coerce_scalar_raw, Input};
use crate::error::{Error, Result};
use crate::leaf::Leaf;
use crate::raw::Raw;
use crate::registry::{FieldDeclaration, ObjectType, TypeDef, TypeRef};
use crate::seq::SparseArray;
use indexmap::IndexMap;
use std::sync::Arc;

/// Typed value stored in a field slot
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Leaf(Leaf),
    Object(Object),
    Array(SparseArray),
}

impl Value {
    /// Returns `true` if this value can be stored unchanged in a non-array
    /// field of type `ty`.
    ///
    /// Objects are instances of their own type and of every supertype it
    /// was derived from; arrays are never instances of a declared type.
    #[must_use]
    pub fn is_instance_of(&self, ty: &TypeRef) -> bool {
        match (self, ty) {
            (Value::Leaf(leaf), TypeRef::Leaf(kind)) => leaf.kind() == kind,
            (Value::Object(obj), TypeRef::Object(ot)) => obj.object_type().is_subtype_of(ot),
            _ => false,
        }
    }

    /// Name of the value's type, for diagnostics
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Value::Leaf(leaf) => leaf.kind().name().to_owned(),
            Value::Object(obj) => obj.type_name(),
            Value::Array(arr) => format!("[{}]", arr.element_type().name()),
        }
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Value::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&SparseArray> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut SparseArray> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Shorthand for the string scalar of a leaf value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_leaf().and_then(Leaf::as_str)
    }
}

impl From<Leaf> for Value {
    fn from(leaf: Leaf) -> Self {
        Value::Leaf(leaf)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<SparseArray> for Value {
    fn from(arr: SparseArray) -> Self {
        Value::Array(arr)
    }
}

/// Instance of a declared composite type
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    ty: ObjectType,
    slots: IndexMap<String, Value>,
}

impl Object {
    /// Constructs an instance of `ty` with every field unset
    #[must_use]
    pub fn new(ty: ObjectType) -> Self {
        Self {
            ty,
            slots: IndexMap::new(),
        }
    }

    /// Constructs an instance of `ty` from a raw tree.
    ///
    /// # Errors
    ///
    ///   * [`Error::UnknownField`] if a mapping key matches no field of `ty`
    ///   * [`Error::FieldCoercion`] if a field rejects the value under its key
    ///   * [`Error::InvalidInputShape`] if `raw` is not a mapping and `ty` has
    ///     no content field
    pub fn from_raw(ty: ObjectType, raw: &Raw) -> Result<Self> {
        let def = ty.definition();
        let mut obj = Self::new(ty);
        let res = match raw {
            Raw::Mapping(m) => m
                .iter()
                .try_for_each(|(key, value)| obj.assign_key(&def, key.as_str(), value)),
            other => match def.content_field() {
                Some(decl) => obj.assign_raw(&def, decl, other),
                None => Err(Error::InvalidInputShape {
                    type_name: def.name().to_owned(),
                    value: other.clone(),
                }),
            },
        };
        match res {
            Ok(()) => Ok(obj),
            Err(err) => {
                tracing::debug!(type_name = %def.name(), error = %err, "construction failed");
                Err(err)
            }
        }
    }

    /// Constructs an instance of `ty` from raw or typed input.
    ///
    /// Typed input is lowered to its representation first; see
    /// [`from_raw`](Object::from_raw) for the construction rules.
    pub fn build(ty: ObjectType, input: impl Into<Input>) -> Result<Self> {
        Self::from_raw(ty, &input.into().into_raw())
    }

    #[inline]
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.ty
    }

    #[must_use]
    pub fn type_name(&self) -> String {
        self.ty.name()
    }

    /// Assigns `value` to the field spelled `key`, coercing it into the
    /// field's declared type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if no field is spelled `key`, and
    /// [`Error::FieldCoercion`] if the value cannot be coerced.
    pub fn set(&mut self, key: &str, value: impl Into<Input>) -> Result<()> {
        let def = self.ty.definition();
        let input = value.into();
        let decl = match def.resolve(key) {
            Some(decl) => Arc::clone(decl),
            None => {
                return Err(Error::UnknownField {
                    type_name: def.name().to_owned(),
                    key: key.to_owned(),
                    value: input.into_raw(),
                })
            }
        };
        let input = match input {
            Input::Typed(v) if !decl.is_array() && v.is_instance_of(decl.value_type()) => {
                self.store(&decl, Some(v));
                return Ok(());
            }
            Input::Typed(Value::Array(arr))
                if decl.is_array() && arr.element_type() == decl.value_type() =>
            {
                self.store(&decl, Some(Value::Array(arr)));
                return Ok(());
            }
            Input::Typed(v) if decl.is_array() && v.is_instance_of(decl.value_type()) => {
                let arr = coerce_array(Input::Typed(v), decl.value_type())?;
                self.store(&decl, Some(Value::Array(arr)));
                return Ok(());
            }
            other => other.into_raw(),
        };
        self.assign_raw(&def, &decl, &input)
    }

    /// Returns the value of the field spelled `key`, materializing its
    /// default if it is unset.
    ///
    /// Leaf fields default to absence, so `Ok(None)` is returned for an
    /// unset leaf field.
    pub fn get(&mut self, key: &str) -> Result<Option<&Value>> {
        Ok(self.get_mut(key)?.map(|v| &*v))
    }

    /// Mutable variant of [`get`](Object::get)
    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut Value>> {
        let def = self.ty.definition();
        let decl = match def.resolve(key) {
            Some(decl) => Arc::clone(decl),
            None => {
                return Err(Error::UnknownField {
                    type_name: def.name().to_owned(),
                    key: key.to_owned(),
                    value: Raw::Null,
                })
            }
        };
        if !self.slots.contains_key(decl.name()) {
            let default = if decl.is_array() {
                Raw::Sequence(Vec::new())
            } else {
                decl.value_type().empty_default()
            };
            self.assign_raw(&def, &decl, &default)?;
        }
        Ok(self.slots.get_mut(decl.name()))
    }

    /// Returns the value of the field spelled `key`, if it is set, without
    /// materializing a default.
    ///
    /// Returns `None` for unknown keys as well.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<&Value> {
        let def = self.ty.definition();
        let decl = def.resolve(key)?;
        self.slots.get(decl.name())
    }

    /// Returns `true` if the field spelled `key` currently holds a value
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.peek(key).is_some()
    }

    /// Removes and returns the value of the field spelled `key`, leaving it unset
    pub fn take(&mut self, key: &str) -> Result<Option<Value>> {
        let def = self.ty.definition();
        match def.resolve(key) {
            Some(decl) => Ok(self.slots.shift_remove(decl.name())),
            None => Err(Error::UnknownField {
                type_name: def.name().to_owned(),
                key: key.to_owned(),
                value: Raw::Null,
            }),
        }
    }

    /// Iterates over the fields holding a value, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        let def = self.ty.definition();
        let order: Vec<usize> = def
            .fields()
            .filter_map(|decl| self.slots.get_index_of(decl.name()))
            .collect();
        order.into_iter().filter_map(move |ix| {
            self.slots
                .get_index(ix)
                .map(|(name, value)| (name.as_str(), value))
        })
    }

    /// Number of fields currently holding a value
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn assign_key(&mut self, def: &TypeDef, key: &str, value: &Raw) -> Result<()> {
        match def.resolve(key) {
            Some(decl) => {
                let decl = Arc::clone(decl);
                self.assign_raw(def, &decl, value)
            }
            None => Err(Error::UnknownField {
                type_name: def.name().to_owned(),
                key: key.to_owned(),
                value: value.clone(),
            }),
        }
    }

    fn assign_raw(&mut self, def: &TypeDef, decl: &FieldDeclaration, raw: &Raw) -> Result<()> {
        let coerced = if decl.is_array() {
            coerce_array_raw(raw, decl.value_type()).map(|arr| Some(Value::Array(arr)))
        } else {
            coerce_scalar_raw(raw, decl.value_type())
        };
        match coerced {
            Ok(value) => {
                self.store(decl, value);
                Ok(())
            }
            Err(source) => Err(Error::FieldCoercion {
                type_name: def.name().to_owned(),
                field: decl.name().to_owned(),
                value: raw.clone(),
                source: Box::new(source),
            }),
        }
    }

    fn store(&mut self, decl: &FieldDeclaration, value: Option<Value>) {
        match value {
            Some(v) => {
                self.slots.insert(decl.name().to_owned(), v);
            }
            None => {
                self.slots.shift_remove(decl.name());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::conv::{ReprOptions, Represent};
    use crate::leaf::{Boolean, Integer, Text};
    use crate::raw::Key;
    use crate::registry::{FieldOptions, CONTENT_KEY};
    use crate::{raw_map, Scalar};

    fn amount_type(name: &str) -> ObjectType {
        let ty = ObjectType::declare(name);
        ty.content(Text)
            .scalar("currencyID", Text, FieldOptions::new().attribute());
        ty
    }

    #[test]
    fn construct_via_aliases() {
        let ty = ObjectType::declare("ObjAliases");
        ty.scalar("errorCode", Integer, FieldOptions::new())
            .scalar("amount", Text, FieldOptions::new().namespace("ebl"))
            .scalar("version", Text, FieldOptions::new().attribute().namespace("ebl"));
        let raw = raw_map! {
            "error_code" => "10",
            "ebl:amount" => "1.00",
            "@ebl:version" => "204",
        };
        let mut obj = Object::from_raw(ty, &raw).unwrap();
        let code = obj.get("errorCode").unwrap().and_then(Value::as_leaf).and_then(Leaf::as_i64);
        assert_eq!(code, Some(10));
        assert_eq!(obj.peek("amount").and_then(Value::as_str), Some("1.00"));
        assert_eq!(obj.peek("@version").and_then(Value::as_str), Some("204"));
        assert_eq!(obj.peek("version"), obj.peek("@ebl:version"));
    }

    #[test]
    fn later_alias_entry_wins() {
        let ty = ObjectType::declare("ObjAliasOrder");
        ty.scalar("errorCode", Text, FieldOptions::new());
        let forward = raw_map! { "errorCode" => "1", "error_code" => "2" };
        let obj = Object::from_raw(ty, &forward).unwrap();
        assert_eq!(obj.peek("errorCode").and_then(Value::as_str), Some("2"));
        assert_eq!(obj.len(), 1);
        let reversed = raw_map! { "error_code" => "2", "errorCode" => "1" };
        let obj = Object::from_raw(ty, &reversed).unwrap();
        assert_eq!(obj.peek("errorCode").and_then(Value::as_str), Some("1"));
    }

    #[test]
    fn unknown_key() {
        let ty = ObjectType::declare("ObjUnknown");
        ty.scalar("known", Text, FieldOptions::new());
        let err = Object::from_raw(ty, &raw_map! { "known" => "a", "bogus" => 5 }).unwrap_err();
        match err {
            Error::UnknownField { type_name, key, value } => {
                assert_eq!(type_name, "ObjUnknown");
                assert_eq!(key, "bogus");
                assert_eq!(value, Raw::from(5));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let mut obj = Object::new(ty);
        assert!(matches!(obj.set("nope", 1), Err(Error::UnknownField { .. })));
        assert!(matches!(obj.get("nope"), Err(Error::UnknownField { .. })));
    }

    #[test]
    fn nested_unknown_key_is_wrapped() {
        let inner = ObjectType::declare("ObjNestedInner");
        inner.scalar("x", Text, FieldOptions::new());
        let outer = ObjectType::declare("ObjNestedOuter");
        outer.object("child", inner, FieldOptions::new());
        let input = raw_map! { "child" => raw_map! { "y" => 1 } };
        let err = Object::from_raw(outer, &input).unwrap_err();
        match &err {
            Error::FieldCoercion { type_name, field, value, source } => {
                assert_eq!(type_name, "ObjNestedOuter");
                assert_eq!(field, "child");
                assert_eq!(value, &raw_map! { "y" => 1 });
                assert!(matches!(**source, Error::UnknownField { ref key, .. } if key == "y"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.field_path(), vec!["child", "y"]);
    }

    #[test]
    fn coercion_failure_carries_context() {
        let ty = ObjectType::declare("ObjCoerceFail");
        ty.scalar("flag", Boolean, FieldOptions::new());
        let err = Object::from_raw(ty, &raw_map! { "flag" => "maybe" }).unwrap_err();
        match err {
            Error::FieldCoercion { field, value, source, .. } => {
                assert_eq!(field, "flag");
                assert_eq!(value, Raw::from("maybe"));
                assert!(matches!(*source, Error::Leaf(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_shape() {
        let ty = ObjectType::declare("ObjShape");
        ty.scalar("a", Text, FieldOptions::new());
        assert!(matches!(
            Object::from_raw(ty, &Raw::from("bare")),
            Err(Error::InvalidInputShape { .. })
        ));
        assert!(matches!(
            Object::from_raw(ty, &Raw::from(vec![1, 2])),
            Err(Error::InvalidInputShape { .. })
        ));
    }

    #[test]
    fn content_type_from_bare_scalar() {
        let ty = amount_type("ObjContent");
        let obj = Object::from_raw(ty, &Raw::from("12.50")).unwrap();
        assert_eq!(obj.peek(CONTENT_KEY).and_then(Value::as_str), Some("12.50"));
        let keyed =
            Object::from_raw(ty, &raw_map! { "@currencyID" => "USD", "value" => "3" }).unwrap();
        assert_eq!(keyed.peek("currency_id").and_then(Value::as_str), Some("USD"));
    }

    #[test]
    fn lazy_defaults() {
        let inner = ObjectType::declare("ObjDefaultInner");
        inner.scalar("x", Text, FieldOptions::new());
        let ty = ObjectType::declare("ObjDefaults");
        ty.scalar("leaf", Text, FieldOptions::new())
            .object("child", inner, FieldOptions::new())
            .array("list", Text, FieldOptions::new());
        let mut obj = Object::new(ty);

        assert_eq!(obj.get("leaf").unwrap(), None);
        assert!(!obj.is_set("leaf"));

        let child = obj.get("child").unwrap().and_then(Value::as_object).cloned().unwrap();
        assert_eq!(child.object_type(), inner);
        assert!(child.is_empty());
        assert!(obj.is_set("child"));

        let list = obj.get("list").unwrap().and_then(Value::as_array).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn nested_mutation_through_get_mut() {
        let inner = ObjectType::declare("ObjMutInner");
        inner.scalar("x", Integer, FieldOptions::new());
        let ty = ObjectType::declare("ObjMutOuter");
        ty.object("child", inner, FieldOptions::new())
            .array("children", inner, FieldOptions::new());
        let mut obj = Object::new(ty);
        obj.get_mut("child")
            .unwrap()
            .and_then(Value::as_object_mut)
            .unwrap()
            .set("x", 4)
            .unwrap();
        obj.get_mut("children")
            .unwrap()
            .and_then(Value::as_array_mut)
            .unwrap()
            .get_mut(1)
            .unwrap()
            .and_then(Value::as_object_mut)
            .unwrap()
            .set("x", "5")
            .unwrap();
        assert_eq!(
            obj.to_representation(&ReprOptions::plain()),
            raw_map!(str {
                "child" => raw_map!(str { "x" => 4 }),
                "children" => vec![raw_map!(str {}), raw_map!(str { "x" => 5 })],
            })
        );
    }

    #[test]
    fn set_then_get_is_coerced() {
        let ty = ObjectType::declare("ObjSetGet");
        ty.scalar("n", Integer, FieldOptions::new());
        let mut obj = Object::new(ty);
        obj.set("n", "42").unwrap();
        let stored = obj.get("n").unwrap().cloned().unwrap();
        assert_eq!(stored.as_leaf().map(Leaf::scalar), Some(&Scalar::from(42)));
        obj.set("n", stored.clone()).unwrap();
        assert_eq!(obj.get("n").unwrap(), Some(&stored));
        obj.set("n", Raw::Null).unwrap();
        assert!(!obj.is_set("n"));
    }

    #[test]
    fn typed_object_assignment_is_identity() {
        let inner = ObjectType::declare("ObjIdentityInner");
        inner.scalar("x", Text, FieldOptions::new());
        let ty = ObjectType::declare("ObjIdentityOuter");
        ty.object("child", inner, FieldOptions::new())
            .array("many", inner, FieldOptions::new());
        let child = Object::from_raw(inner, &raw_map! { "x" => "a" }).unwrap();
        let mut obj = Object::new(ty);
        obj.set("child", child.clone()).unwrap();
        obj.set("many", child.clone()).unwrap();
        assert_eq!(obj.peek("child").and_then(Value::as_object), Some(&child));
        let many = obj.peek("many").and_then(Value::as_array).unwrap();
        assert_eq!(many.len(), 1);
        assert_eq!(many.peek(0).and_then(Value::as_object), Some(&child));
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let ty = ObjectType::declare("ObjIterOrder");
        ty.scalar("a", Text, FieldOptions::new())
            .scalar("b", Text, FieldOptions::new())
            .scalar("c", Text, FieldOptions::new());
        let obj = Object::from_raw(ty, &raw_map! { "c" => "3", "a" => "1" }).unwrap();
        let names: Vec<&str> = obj.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(obj.len(), 2);
    }

    #[test]
    fn take_unsets() {
        let ty = ObjectType::declare("ObjTake");
        ty.scalar("a", Text, FieldOptions::new());
        let mut obj = Object::from_raw(ty, &raw_map! { "a" => "1" }).unwrap();
        assert!(obj.take("a").unwrap().is_some());
        assert!(!obj.is_set("a"));
        assert_eq!(obj.to_hash(), Raw::Mapping(Default::default()));
    }

    #[test]
    fn symbol_keys_are_matched_by_text() {
        let ty = ObjectType::declare("ObjSymbolKeys");
        ty.scalar("a", Text, FieldOptions::new());
        let raw = Raw::Mapping([(Key::symbol("a"), Raw::from("x"))].into_iter().collect());
        let obj = Object::from_raw(ty, &raw).unwrap();
        assert_eq!(obj.peek("a").and_then(Value::as_str), Some("x"));
    }
}
