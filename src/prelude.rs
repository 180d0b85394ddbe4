//! Assorted imports for schema authors
//!
//! Glob-importing this module brings in everything needed to declare a
//! schema with [`message!`](crate::message), build objects from raw trees,
//! and serialize them back.

pub use crate::conv::{ReprOptions, Represent};
pub use crate::error::{Error, Result};
pub use crate::leaf::{Boolean, Float, Integer, LeafKind, Text};
pub use crate::object::{Object, Value};
pub use crate::raw::{Key, Raw, Scalar};
pub use crate::registry::{Declared, FieldOptions, ObjectType};
pub use crate::{message, raw_map, raw_seq};
