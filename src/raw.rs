//! Generic key-value intermediate representation
//!
//! The [`Raw`] tree is the shape produced by parsing a semi-structured
//! payload (XML-as-hash, JSON-as-hash) and consumed when re-encoding one. It
//! is the input accepted by typed-object construction and the output of
//! [`Represent::to_representation`](crate::conv::Represent::to_representation).
//!
//! The tree is a closed variant over mappings, sequences, scalars, and an
//! explicit null; no typed objects are ever embedded in it.
//!
//! # Keys
//!
//! Mapping keys come in two spellings, [`Key::Symbol`] and [`Key::Str`],
//! mirroring the symbolic and string keys of a host representation. The two
//! are distinct as map keys, but all field matching is performed on the text
//! of the key alone.

use indexmap::IndexMap;
use num_bigint::BigInt;
use std::fmt::{Display, Formatter};

/// Insertion-ordered mapping from keys to raw values
pub type Mapping = IndexMap<Key, Raw>;

/// Key of a raw [`Mapping`]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Symbolic key
    Symbol(String),
    /// String key
    Str(String),
}

impl Key {
    /// Constructs a [`Key::Symbol`] with the given text
    pub fn symbol(s: impl Into<String>) -> Self {
        Self::Symbol(s.into())
    }

    /// Constructs a [`Key::Str`] with the given text
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Returns the text of the key, irrespective of its kind
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Key::Symbol(s) | Key::Str(s) => s.as_str(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_symbol(&self) -> bool {
        matches!(self, Key::Symbol(_))
    }

    /// Destructs the key into its text
    pub fn into_string(self) -> String {
        match self {
            Key::Symbol(s) | Key::Str(s) => s,
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Symbol(s) => write!(f, ":{}", s),
            Key::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Leaf-level value of a raw tree
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(BigInt),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Returns `true` for the empty-string sentinel, which coerces to absence.
    #[must_use]
    pub fn is_empty_str(&self) -> bool {
        matches!(self, Scalar::Str(s) if s.is_empty())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Scalar::Int(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Scalar::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Scalar::Float(x) => Some(x),
            _ => None,
        }
    }

    /// Renders the scalar as plain text, without quoting strings
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(x) => x.to_string(),
            Scalar::Str(s) => s.clone(),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => Display::fmt(b, f),
            Scalar::Int(i) => Display::fmt(i, f),
            Scalar::Float(x) => Display::fmt(x, f),
            Scalar::Str(s) => write!(f, "{:?}", s),
        }
    }
}

macro_rules! scalar_from_int {
    ( $( $t:ty ),+ ) => {
        $(
            impl From<$t> for Scalar {
                fn from(val: $t) -> Self {
                    Scalar::Int(BigInt::from(val))
                }
            }

            impl From<$t> for Raw {
                fn from(val: $t) -> Self {
                    Raw::Scalar(Scalar::from(val))
                }
            }
        )+
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, BigInt);

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

/// Node of a generic key-value tree
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Raw {
    #[default]
    Null,
    Scalar(Scalar),
    Sequence(Vec<Raw>),
    Mapping(Mapping),
}

impl Raw {
    /// Constructs a [`Raw::Mapping`] from an iterator of key-value pairs,
    /// preserving iteration order.
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Raw>,
        I: IntoIterator<Item = (K, V)>,
    {
        Raw::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Constructs an empty [`Raw::Mapping`]
    #[must_use]
    pub fn empty_mapping() -> Self {
        Raw::Mapping(Mapping::new())
    }

    /// Constructs a [`Raw::Sequence`] from an iterator of values
    pub fn sequence<V, I>(items: I) -> Self
    where
        V: Into<Raw>,
        I: IntoIterator<Item = V>,
    {
        Raw::Sequence(items.into_iter().map(Into::into).collect())
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Raw::Null)
    }

    /// Returns `true` if this value coerces to absence: null, or the empty string.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            Raw::Null => true,
            Raw::Scalar(s) => s.is_empty_str(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Raw::Mapping(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Raw]> {
        match self {
            Raw::Sequence(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Raw::Scalar(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Looks up the entry of a mapping whose key has the given text.
    ///
    /// Symbolic and string keys are both matched; if both spellings are
    /// present, the first in insertion order is returned. Returns `None`
    /// for non-mapping values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Raw> {
        self.as_mapping()?
            .iter()
            .find_map(|(k, v)| (k.as_str() == key).then_some(v))
    }

    /// Returns the element at a position of a sequence, or `None` for
    /// non-sequence values.
    #[must_use]
    pub fn index(&self, ix: usize) -> Option<&Raw> {
        self.as_sequence()?.get(ix)
    }

    /// Returns the key texts of a mapping in order, or an empty vector
    /// for non-mapping values.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Raw::Mapping(m) => m.keys().map(Key::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl Display for Raw {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Raw::Null => write!(f, "null"),
            Raw::Scalar(s) => Display::fmt(s, f),
            Raw::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    Display::fmt(item, f)?;
                }
                write!(f, "]")
            }
            Raw::Mapping(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<Scalar> for Raw {
    fn from(s: Scalar) -> Self {
        Raw::Scalar(s)
    }
}

impl From<bool> for Raw {
    fn from(b: bool) -> Self {
        Raw::Scalar(Scalar::Bool(b))
    }
}

impl From<f64> for Raw {
    fn from(x: f64) -> Self {
        Raw::Scalar(Scalar::Float(x))
    }
}

impl From<&str> for Raw {
    fn from(s: &str) -> Self {
        Raw::Scalar(Scalar::from(s))
    }
}

impl From<String> for Raw {
    fn from(s: String) -> Self {
        Raw::Scalar(Scalar::Str(s))
    }
}

impl From<Mapping> for Raw {
    fn from(m: Mapping) -> Self {
        Raw::Mapping(m)
    }
}

impl<T: Into<Raw>> From<Vec<T>> for Raw {
    fn from(v: Vec<T>) -> Self {
        Raw::sequence(v)
    }
}

impl<T: Into<Raw>> From<Option<T>> for Raw {
    fn from(val: Option<T>) -> Self {
        val.map_or(Raw::Null, Into::into)
    }
}
