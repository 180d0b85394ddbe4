//! Per-type tables of field declarations
//!
//! Every composite type in a schema is registered here once, at
//! schema-definition time, and is referred to thereafter through a copyable
//! [`ObjectType`] handle. The registry owns, for each type, an ordered table
//! of [`FieldDeclaration`]s and the alias-resolution table derived from it.
//!
//! # Inheritance
//!
//! A subtype is created from a *snapshot* of its supertype's table, taken at
//! the moment [`ObjectType::subtype`] is called. Fields added to the supertype
//! afterwards are not visible to the subtype; fields added to the subtype are
//! appended after the inherited ones, and re-declaring an inherited field
//! replaces its declaration without moving it.
//!
//! # Concurrency
//!
//! The registry is process-wide. Declarations are expected to happen in a
//! single definition phase before typed objects are built, but the table is
//! guarded by a lock so that late declarations remain sound. Each type's
//! table is copied on write, so readers holding an [`Arc<TypeDef>`] keep a
//! consistent view.

use crate::leaf::{Boolean, Float, Integer, LeafKind, LeafRef, Text};
use crate::names::{
    attribute_key, namespaced_attribute_key, namespaced_key, to_separated_lowercase,
};
use crate::raw::Raw;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Reserved canonical name of the content field
///
/// A content field captures a bare scalar passed to construction in place of
/// a keyed mapping. It is never decorated with namespace or attribute
/// markers when serialized.
pub const CONTENT_KEY: &str = "value";

cfg_if::cfg_if! {
    if #[cfg(feature = "smallvec_aliases")] {
        /// Collection of the accepted spellings of one field
        pub type Aliases = smallvec::SmallVec<[String; 4]>;
    } else {
        /// Collection of the accepted spellings of one field
        pub type Aliases = Vec<String>;
    }
}

lazy_static::lazy_static! {
    static ref TYPES: RwLock<Vec<Arc<TypeDef>>> = RwLock::new(Vec::new());
}

fn read_types() -> RwLockReadGuard<'static, Vec<Arc<TypeDef>>> {
    TYPES.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_types() -> RwLockWriteGuard<'static, Vec<Arc<TypeDef>>> {
    TYPES.write().unwrap_or_else(PoisonError::into_inner)
}

/// Reference to the declared type of a field: a leaf type or a composite type
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Leaf(LeafRef),
    Object(ObjectType),
}

impl TypeRef {
    /// Name of the referenced type, for diagnostics
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            TypeRef::Leaf(kind) => kind.name().to_owned(),
            TypeRef::Object(ty) => ty.name(),
        }
    }

    /// The raw value a field of this type is defaulted from when read unset.
    ///
    /// Leaf types default from null (and therefore to absence), composite
    /// types from an empty mapping.
    #[must_use]
    pub fn empty_default(&self) -> Raw {
        match self {
            TypeRef::Leaf(_) => Raw::Null,
            TypeRef::Object(_) => Raw::empty_mapping(),
        }
    }
}

/// Trait for anything that can stand as the declared type of a field
pub trait Declared {
    fn type_ref(&self) -> TypeRef;
}

impl Declared for TypeRef {
    fn type_ref(&self) -> TypeRef {
        self.clone()
    }
}

impl Declared for ObjectType {
    fn type_ref(&self) -> TypeRef {
        TypeRef::Object(*self)
    }
}

impl Declared for LeafRef {
    fn type_ref(&self) -> TypeRef {
        TypeRef::Leaf(self.clone())
    }
}

macro_rules! declared_leaf {
    ( $( $t:ty ),+ ) => {
        $(
            impl Declared for $t {
                fn type_ref(&self) -> TypeRef {
                    TypeRef::Leaf(LeafRef::new(*self))
                }
            }
        )+
    };
}

declared_leaf!(Text, Integer, Float, Boolean);

/// Options recognized when declaring a field
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Field holds a sparse array of values of the declared type
    pub array: bool,
    /// Field is keyed as an attribute of its enclosing element
    pub attribute: bool,
    /// Namespace prefix qualifying the field's key
    pub namespace: Option<String>,
}

impl FieldOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    #[must_use]
    pub fn attribute(mut self) -> Self {
        self.attribute = true;
        self
    }

    #[must_use]
    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }
}

/// Metadata describing one named field of a declared type
///
/// Immutable once registered; re-declaring a field replaces the whole
/// declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDeclaration {
    name: String,
    value_type: TypeRef,
    array: bool,
    attribute: bool,
    namespace: Option<String>,
    content: bool,
}

impl FieldDeclaration {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn value_type(&self) -> &TypeRef {
        &self.value_type
    }

    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.array
    }

    #[inline]
    #[must_use]
    pub fn is_attribute(&self) -> bool {
        self.attribute
    }

    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns `true` for the content field of a content type
    #[inline]
    #[must_use]
    pub fn is_content(&self) -> bool {
        self.content
    }

    /// Every spelling under which this field is reachable, canonical first:
    ///
    ///   * the canonical name
    ///   * the separated-lowercase name
    ///   * `ns:name`, if a namespace is set
    ///   * `@name`, if the field is an attribute
    ///   * `@ns:name`, if both are set
    ///
    /// Duplicate spellings are listed once.
    #[must_use]
    pub fn aliases(&self) -> Aliases {
        let mut out = Aliases::new();
        let mut add = |s: String| {
            if !out.contains(&s) {
                out.push(s);
            }
        };
        add(self.name.clone());
        add(to_separated_lowercase(&self.name));
        if let Some(ns) = &self.namespace {
            add(namespaced_key(ns, &self.name));
        }
        if self.attribute {
            add(attribute_key(&self.name));
            if let Some(ns) = &self.namespace {
                add(namespaced_attribute_key(ns, &self.name));
            }
        }
        out
    }
}

/// Table of field declarations for one composite type
#[derive(Clone, Debug)]
pub struct TypeDef {
    name: String,
    supertype: Option<ObjectType>,
    fields: IndexMap<String, Arc<FieldDeclaration>>,
    aliases: HashMap<String, String>,
}

impl TypeDef {
    fn new(name: String, supertype: Option<ObjectType>) -> Self {
        Self {
            name,
            supertype,
            fields: IndexMap::new(),
            aliases: HashMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn supertype(&self) -> Option<ObjectType> {
        self.supertype
    }

    /// Iterates over the field declarations in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &Arc<FieldDeclaration>> + '_ {
        self.fields.values()
    }

    /// Looks up a field by its canonical name only
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDeclaration>> {
        self.fields.get(name)
    }

    /// Looks up a field by any of its accepted spellings
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&Arc<FieldDeclaration>> {
        self.aliases.get(key).and_then(|name| self.fields.get(name))
    }

    /// Returns the content field, if this is a content type
    #[must_use]
    pub fn content_field(&self) -> Option<&Arc<FieldDeclaration>> {
        self.fields.values().find(|decl| decl.content)
    }

    fn insert(&mut self, decl: FieldDeclaration) {
        // existing names keep their position
        self.fields.insert(decl.name.clone(), Arc::new(decl));
        self.rebuild_aliases();
    }

    fn rebuild_aliases(&mut self) {
        self.aliases.clear();
        for decl in self.fields.values() {
            for alias in decl.aliases() {
                self.aliases.insert(alias, decl.name.clone());
            }
        }
        for name in self.fields.keys() {
            self.aliases.insert(name.clone(), name.clone());
        }
    }
}

/// Handle to a composite type declared in the process-wide registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectType(usize);

impl ObjectType {
    /// Registers a new root type with no fields.
    pub fn declare(name: impl Into<String>) -> Self {
        let name = name.into();
        let ty = {
            let mut types = write_types();
            types.push(Arc::new(TypeDef::new(name.clone(), None)));
            ObjectType(types.len() - 1)
        };
        tracing::debug!(type_name = %name, id = ty.0, "declared type");
        ty
    }

    /// Registers a new type whose field table starts as a copy of this
    /// type's table as it stands now.
    pub fn subtype(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        let (ty, inherited) = {
            let mut types = write_types();
            let mut def = TypeDef::clone(&types[self.0]);
            def.name = name.clone();
            def.supertype = Some(*self);
            let inherited = def.fields.len();
            types.push(Arc::new(def));
            (ObjectType(types.len() - 1), inherited)
        };
        tracing::debug!(
            type_name = %name,
            id = ty.0,
            supertype = self.0,
            inherited,
            "declared subtype"
        );
        ty
    }

    /// Returns a snapshot of this type's current table
    #[must_use]
    pub fn definition(&self) -> Arc<TypeDef> {
        Arc::clone(&read_types()[self.0])
    }

    #[must_use]
    pub fn name(&self) -> String {
        read_types()[self.0].name.clone()
    }

    #[must_use]
    pub fn supertype(&self) -> Option<ObjectType> {
        read_types()[self.0].supertype
    }

    /// Returns `true` if `self` is `other` or was derived from it, directly or transitively
    #[must_use]
    pub fn is_subtype_of(&self, other: &ObjectType) -> bool {
        let types = read_types();
        let mut cur = Some(*self);
        while let Some(ty) = cur {
            if ty == *other {
                return true;
            }
            cur = types[ty.0].supertype;
        }
        false
    }

    /// Registers a field declaration on this type.
    ///
    /// Declaring a name that already exists replaces the earlier declaration
    /// in place. Returns `self` to allow chained declarations.
    pub fn declare_field(
        &self,
        name: impl Into<String>,
        ty: impl Declared,
        options: FieldOptions,
    ) -> Self {
        self.insert(FieldDeclaration {
            name: name.into(),
            value_type: ty.type_ref(),
            array: options.array,
            attribute: options.attribute,
            namespace: options.namespace,
            content: false,
        })
    }

    /// Declares a non-array field of a leaf type
    pub fn scalar(
        &self,
        name: impl Into<String>,
        kind: impl LeafKind,
        options: FieldOptions,
    ) -> Self {
        let options = FieldOptions { array: false, ..options };
        self.declare_field(name, LeafRef::new(kind), options)
    }

    /// Declares a non-array field holding a nested object
    pub fn object(&self, name: impl Into<String>, ty: ObjectType, options: FieldOptions) -> Self {
        let options = FieldOptions { array: false, ..options };
        self.declare_field(name, ty, options)
    }

    /// Declares an array field with the given element type
    pub fn array(&self, name: impl Into<String>, ty: impl Declared, options: FieldOptions) -> Self {
        self.declare_field(name, ty, options.array())
    }

    /// Allocates the content field, making this a content type.
    ///
    /// The field is named [`CONTENT_KEY`] and captures a bare, non-mapping
    /// value passed to construction.
    pub fn content(&self, ty: impl Declared) -> Self {
        self.insert(FieldDeclaration {
            name: CONTENT_KEY.to_owned(),
            value_type: ty.type_ref(),
            array: false,
            attribute: false,
            namespace: None,
            content: true,
        })
    }

    fn insert(&self, decl: FieldDeclaration) -> Self {
        let (name, array, attribute, namespace) = (
            decl.name.clone(),
            decl.array,
            decl.attribute,
            decl.namespace.clone(),
        );
        let type_name = {
            let mut types = write_types();
            let def = Arc::make_mut(&mut types[self.0]);
            def.insert(decl);
            def.name.clone()
        };
        tracing::debug!(
            type_name = %type_name,
            field = %name,
            array,
            attribute,
            namespace = ?namespace,
            "declared field"
        );
        *self
    }

    /// Ordered canonical field names: inherited first, then own
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        read_types()[self.0].fields.keys().cloned().collect()
    }

    /// Looks up a field declaration by any of its accepted spellings
    #[must_use]
    pub fn declaration(&self, key: &str) -> Option<Arc<FieldDeclaration>> {
        read_types()[self.0].resolve(key).cloned()
    }

    /// Returns the accepted spellings of the field named `name` (or any alias of it)
    #[must_use]
    pub fn aliases_of(&self, name: &str) -> Option<Aliases> {
        self.declaration(name).map(|decl| decl.aliases())
    }

    #[must_use]
    pub fn is_content_type(&self) -> bool {
        read_types()[self.0].content_field().is_some()
    }
}
