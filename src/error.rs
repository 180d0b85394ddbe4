//! General error types
//!
//! This module contains the error hierarchy reported by the declaration,
//! coercion, and construction machinery of this crate.
//!
//! # Layout
//!
//! The primary type is [`Error`], with the alias [`Result<T>`]. Failures
//! produced by leaf-type parsing are represented by the narrower
//! [`LeafError`], which is lifted into [`Error::Leaf`] when it crosses
//! into the object layer.
//!
//! Every variant carries enough context (owning type, field or key, offending
//! raw value) to locate the failure without inspecting the lower-level cause,
//! but the cause is always kept, through [`std::error::Error::source`], rather
//! than discarded.

use crate::raw::{Raw, Scalar};

/// Error type for a scalar that a leaf type could not interpret
///
/// Produced by [`LeafKind::parse`](crate::leaf::LeafKind::parse) implementations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("cannot interpret {found} as a value of leaf type `{expected}`")]
pub struct LeafError {
    /// Name of the leaf type that rejected the scalar
    pub expected: &'static str,
    /// The scalar that was rejected
    pub found: Scalar,
}

impl LeafError {
    pub fn new(expected: &'static str, found: &Scalar) -> Self {
        Self {
            expected,
            found: found.clone(),
        }
    }
}

/// Enumeration over all failures that may arise while constructing
/// or assigning into a typed object.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Raw input named a key that matches no field (or alias of a field)
    /// of the target type.
    #[error("type `{type_name}` has no field matching key `{key}` (value: {value})")]
    UnknownField {
        type_name: String,
        key: String,
        value: Raw,
    },
    /// A field setter could not convert the supplied value into the
    /// declared type of the field.
    ///
    /// The lower-level failure is kept in `source`.
    #[error("could not assign {value} to field `{field}` of type `{type_name}`")]
    FieldCoercion {
        type_name: String,
        field: String,
        value: Raw,
        #[source]
        source: Box<Error>,
    },
    /// Construction received a raw value of a shape the target type
    /// cannot be built from.
    #[error("invalid input shape for type `{type_name}`: {value}")]
    InvalidInputShape { type_name: String, value: Raw },
    /// A leaf type rejected a scalar value.
    #[error(transparent)]
    Leaf(#[from] LeafError),
}

impl Error {
    /// Returns the innermost error in a chain of [`Error::FieldCoercion`] wrappers.
    ///
    /// This is the failure that would have been reported had the offending
    /// value been assigned directly, rather than through enclosing objects.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        let mut cur = self;
        while let Error::FieldCoercion { source, .. } = cur {
            cur = source;
        }
        cur
    }

    /// Returns the sequence of field names leading from the outermost
    /// object to the point of failure.
    #[must_use]
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut cur = self;
        while let Error::FieldCoercion { field, source, .. } = cur {
            path.push(field.as_str());
            cur = source;
        }
        if let Error::UnknownField { key, .. } = cur {
            path.push(key.as_str());
        }
        path
    }
}

/// Type alias for Result with an error type of [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn error_threadsafe() {
        dummy::<Error>()
    }

    #[test]
    fn chain() {
        let inner = Error::UnknownField {
            type_name: "Amount".into(),
            key: "bogus".into(),
            value: Raw::from("x"),
        };
        let outer = Error::FieldCoercion {
            type_name: "Payment".into(),
            field: "amount".into(),
            value: Raw::Null,
            source: Box::new(inner.clone()),
        };
        assert_eq!(outer.root_cause(), &inner);
        assert_eq!(outer.field_path(), vec!["amount", "bogus"]);
        let src = std::error::Error::source(&outer).map(|e| e.to_string());
        assert_eq!(src, Some(inner.to_string()));
    }

    #[test]
    fn leaf_message() {
        let err: Error = LeafError::new("integer", &Scalar::from("abc")).into();
        assert_eq!(
            err.to_string(),
            "cannot interpret \"abc\" as a value of leaf type `integer`"
        );
    }
}
