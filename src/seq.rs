//! Sparse, lazily-defaulted sequences
//!
//! This module defines [`SparseArray`], the value stored in every field
//! declared with the `array` option. It is an indexed sequence of coerced
//! elements of one declared type, in which any position may be unset.
//!
//! # Defaults
//!
//! Each array carries a per-index default, namely the coercion of the element
//! type's empty default (absence for leaf elements, an empty object for
//! composite elements). Reading a position that was never assigned
//! materializes that default, as does filling the gap before a position
//! assigned out of order.
//!
//! # Merging
//!
//! [`SparseArray::merge`] accepts three shapes of raw input:
//!
//!   * a sequence, whose elements are assigned to positions `0..n`
//!   * a non-empty mapping whose keys are all strings of decimal digits,
//!     each entry assigned to the position its key names
//!   * any other value, assigned to position `0`

use crate::coerce::{coerce_scalar, coerce_scalar_raw, Input};
use crate::error::{Error, Result};
use crate::object::Value;
use crate::raw::{Mapping, Raw};
use crate::registry::TypeRef;

/// Largest number of unset positions a single assignment may open up
/// beyond the current end of an array
pub const MAX_GAP: usize = 1 << 16;

/// Indexed sequence of coerced values of one element type
#[derive(Clone, Debug, PartialEq)]
pub struct SparseArray {
    elem: TypeRef,
    items: Vec<Option<Value>>,
}

impl SparseArray {
    /// Constructs a new, empty array of the given element type
    #[must_use]
    pub fn new(elem: TypeRef) -> Self {
        Self {
            elem,
            items: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn element_type(&self) -> &TypeRef {
        &self.elem
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over every position, yielding `None` for absent elements
    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.items.iter().map(Option::as_ref)
    }

    /// Returns the element at `ix` without materializing a default
    #[must_use]
    pub fn peek(&self, ix: usize) -> Option<&Value> {
        self.items.get(ix).and_then(Option::as_ref)
    }

    /// Returns the element at `ix`, materializing the element default at
    /// that position (and at any gap before it) if it is unset.
    ///
    /// For leaf element types the default is absence, so `Ok(None)` may
    /// still be returned.
    pub fn get(&mut self, ix: usize) -> Result<Option<&Value>> {
        Ok(self.get_mut(ix)?.map(|v| &*v))
    }

    /// Mutable variant of [`get`](SparseArray::get)
    pub fn get_mut(&mut self, ix: usize) -> Result<Option<&mut Value>> {
        if self.items.get(ix).map_or(true, Option::is_none) {
            let default = self.default_value()?;
            self.place(ix, default)?;
        }
        Ok(self.items[ix].as_mut())
    }

    /// Coerces `value` into the element type and stores it at `ix`
    pub fn set(&mut self, ix: usize, value: impl Into<Input>) -> Result<()> {
        let value = coerce_scalar(value.into(), &self.elem)?;
        self.place(ix, value)
    }

    /// Coerces `value` into the element type and stores it after the last position
    pub fn push(&mut self, value: impl Into<Input>) -> Result<()> {
        self.set(self.items.len(), value)
    }

    /// Merges raw or typed input into this array, according to the
    /// rules described in the [module-level documentation](self).
    ///
    /// A typed array is merged element-wise; any other typed value is
    /// assigned to position `0`. A null input leaves the array unchanged.
    pub fn merge(&mut self, input: impl Into<Input>) -> Result<()> {
        match input.into() {
            Input::Typed(Value::Array(other)) => {
                for (ix, item) in other.items.into_iter().enumerate() {
                    match item {
                        Some(v) => self.set(ix, Input::Typed(v))?,
                        None => self.set_raw(ix, &Raw::Null)?,
                    }
                }
                Ok(())
            }
            Input::Typed(v) => self.set(0, Input::Typed(v)),
            Input::Raw(raw) => self.merge_raw(&raw),
        }
    }

    /// Merges a borrowed raw value into this array
    pub fn merge_raw(&mut self, raw: &Raw) -> Result<()> {
        match raw {
            Raw::Null => Ok(()),
            Raw::Sequence(items) => {
                for (ix, item) in items.iter().enumerate() {
                    self.set_raw(ix, item)?;
                }
                Ok(())
            }
            Raw::Mapping(m) if is_index_mapping(m) => {
                for (key, item) in m {
                    let ix = key.as_str().parse::<usize>().map_err(|_| Error::InvalidInputShape {
                        type_name: self.elem.name(),
                        value: raw.clone(),
                    })?;
                    self.set_raw(ix, item)?;
                }
                Ok(())
            }
            other => self.set_raw(0, other),
        }
    }

    fn set_raw(&mut self, ix: usize, raw: &Raw) -> Result<()> {
        let value = coerce_scalar_raw(raw, &self.elem)?;
        self.place(ix, value)
    }

    fn default_value(&self) -> Result<Option<Value>> {
        coerce_scalar_raw(&self.elem.empty_default(), &self.elem)
    }

    fn place(&mut self, ix: usize, value: Option<Value>) -> Result<()> {
        let len = self.items.len();
        if ix < len {
            self.items[ix] = value;
            return Ok(());
        }
        let gap = ix - len;
        if gap > MAX_GAP || self.items.try_reserve(gap + 1).is_err() {
            tracing::debug!(len, index = ix, element = %self.elem.name(), "index out of reach");
            return Err(Error::InvalidInputShape {
                type_name: self.elem.name(),
                value: Raw::from(ix),
            });
        }
        if gap > 0 {
            tracing::trace!(from = len, to = ix, element = %self.elem.name(), "filling gap");
            let default = self.default_value()?;
            self.items.resize(ix, default);
        }
        self.items.push(value);
        Ok(())
    }
}

/// Returns `true` if a mapping is to be read as sparse array positions
fn is_index_mapping(m: &Mapping) -> bool {
    !m.is_empty()
        && m.keys().all(|k| {
            let s = k.as_str();
            !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
        })
}
