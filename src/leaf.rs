//! Leaf (scalar container) types
//!
//! A leaf type interprets a raw [`Scalar`] into the canonical scalar it
//! stores, or rejects it. Leaf types are where primitive parsing happens;
//! everything above them is structural.
//!
//! Schemas for a particular remote API will usually want their own leaf
//! types (enumerations, date-times, currency codes); they only need to
//! implement [`LeafKind`]. The four built-ins defined here cover the
//! primitives every schema needs.

use crate::error::LeafError;
use crate::raw::Scalar;
use num_bigint::{BigInt, Sign};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Trait for types that interpret raw scalars into stored leaf values
///
/// Two leaf kinds are considered the same type if and only if their
/// [`name`](LeafKind::name) values are equal, so implementors must choose
/// names that are unique within a schema.
pub trait LeafKind: Send + Sync + 'static {
    /// Unique name of the leaf type, used in error reports and type identity
    fn name(&self) -> &'static str;

    /// Interprets a raw scalar as a value of this leaf type.
    ///
    /// # Errors
    ///
    /// Returns a [`LeafError`] if the scalar is not a legal value.
    fn parse(&self, raw: &Scalar) -> Result<Scalar, LeafError>;
}

/// Leaf type accepting any scalar, stored as its textual rendering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Text;

/// Leaf type for arbitrary-precision integers
///
/// Accepts integer scalars, strings holding a base-10 integer (surrounding
/// whitespace permitted), and floats without a fractional part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Integer;

/// Leaf type for double-precision floats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Float;

/// Leaf type for booleans
///
/// Accepts booleans, the integers `0` and `1`, and the strings `true`,
/// `false`, `1`, `0` in any letter-case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Boolean;

impl LeafKind for Text {
    fn name(&self) -> &'static str {
        "string"
    }

    fn parse(&self, raw: &Scalar) -> Result<Scalar, LeafError> {
        Ok(Scalar::Str(raw.to_text()))
    }
}

impl LeafKind for Integer {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn parse(&self, raw: &Scalar) -> Result<Scalar, LeafError> {
        match raw {
            Scalar::Int(_) => Ok(raw.clone()),
            Scalar::Str(s) => s
                .trim()
                .parse::<BigInt>()
                .map(Scalar::Int)
                .map_err(|_| LeafError::new(self.name(), raw)),
            // finite and integral, so the decimal rendering is exact
            Scalar::Float(x) if x.is_finite() && x.fract() == 0.0 => format!("{:.0}", x)
                .parse::<BigInt>()
                .map(Scalar::Int)
                .map_err(|_| LeafError::new(self.name(), raw)),
            _ => Err(LeafError::new(self.name(), raw)),
        }
    }
}

impl LeafKind for Float {
    fn name(&self) -> &'static str {
        "float"
    }

    fn parse(&self, raw: &Scalar) -> Result<Scalar, LeafError> {
        match raw {
            Scalar::Float(_) => Ok(raw.clone()),
            Scalar::Int(i) => match i.to_string().parse::<f64>() {
                Ok(x) if x.is_finite() => Ok(Scalar::Float(x)),
                _ => Err(LeafError::new(self.name(), raw)),
            },
            Scalar::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(Scalar::Float)
                .map_err(|_| LeafError::new(self.name(), raw)),
            Scalar::Bool(_) => Err(LeafError::new(self.name(), raw)),
        }
    }
}

impl LeafKind for Boolean {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn parse(&self, raw: &Scalar) -> Result<Scalar, LeafError> {
        match raw {
            Scalar::Bool(_) => Ok(raw.clone()),
            Scalar::Int(i) if i.sign() == Sign::NoSign => Ok(Scalar::Bool(false)),
            Scalar::Int(i) if *i == BigInt::from(1) => Ok(Scalar::Bool(true)),
            Scalar::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Scalar::Bool(true)),
                "false" | "0" => Ok(Scalar::Bool(false)),
                _ => Err(LeafError::new(self.name(), raw)),
            },
            _ => Err(LeafError::new(self.name(), raw)),
        }
    }
}

/// Shared handle to a leaf type
#[derive(Clone)]
pub struct LeafRef(Arc<dyn LeafKind>);

impl LeafRef {
    pub fn new<L: LeafKind>(kind: L) -> Self {
        Self(Arc::new(kind))
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Calls [`LeafKind::parse`] on the underlying leaf type
    pub fn parse(&self, raw: &Scalar) -> Result<Scalar, LeafError> {
        self.0.parse(raw)
    }
}

impl PartialEq for LeafRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for LeafRef {}

impl Debug for LeafRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LeafRef({})", self.name())
    }
}

/// Instance of a leaf type: the kind it was parsed by, and the parsed scalar
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    kind: LeafRef,
    scalar: Scalar,
}

impl Leaf {
    /// Parses a raw scalar as a value of the given leaf type.
    pub fn parse(kind: &LeafRef, raw: &Scalar) -> Result<Self, LeafError> {
        Ok(Self {
            kind: kind.clone(),
            scalar: kind.parse(raw)?,
        })
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &LeafRef {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// Destructs the leaf and returns its scalar
    #[must_use]
    pub fn into_scalar(self) -> Scalar {
        self.scalar
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.scalar.as_str()
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.scalar.as_int().and_then(|i| i64::try_from(i).ok())
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.scalar.as_bool()
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.scalar.as_float()
    }
}
