//! Declarative macros for building raw trees and declaring schemas

/// Builds a [`Raw::Mapping`](crate::raw::Raw::Mapping) from `key => value` pairs.
///
/// Keys are [`Key::Str`](crate::raw::Key::Str) by default; prefix the body
/// with `sym` to produce [`Key::Symbol`](crate::raw::Key::Symbol) keys
/// instead. Values are converted with `Raw::from`.
///
/// ```
/// use datatypes::{raw_map, Raw};
///
/// let m = raw_map! { "id" => 7, "tags" => vec!["x", "y"], "note" => Raw::Null };
/// assert_eq!(m.to_string(), r#"{"id" => 7, "tags" => ["x", "y"], "note" => null}"#);
/// let s = raw_map!(sym { "id" => 7 });
/// assert!(s.as_mapping().unwrap().keys().all(|k| k.is_symbol()));
/// ```
#[macro_export]
macro_rules! raw_map {
    (sym { $( $k:expr => $v:expr ),* $(,)? }) => {
        $crate::raw_map!(@build symbol; $( $k => $v ),*)
    };
    (str { $( $k:expr => $v:expr ),* $(,)? }) => {
        $crate::raw_map!(@build string; $( $k => $v ),*)
    };
    (@build $ctor:ident; $( $k:expr => $v:expr ),*) => {{
        #[allow(unused_mut)]
        let mut m = $crate::raw::Mapping::new();
        $( m.insert($crate::raw::Key::$ctor($k), $crate::raw::Raw::from($v)); )*
        $crate::raw::Raw::Mapping(m)
    }};
    ( $( $k:expr => $v:expr ),* $(,)? ) => {
        $crate::raw_map!(@build string; $( $k => $v ),*)
    };
}

/// Builds a [`Raw::Sequence`](crate::raw::Raw::Sequence) from a list of values,
/// each converted with `Raw::from`.
#[macro_export]
macro_rules! raw_seq {
    ( $( $v:expr ),* $(,)? ) => {
        $crate::raw::Raw::Sequence(::std::vec![ $( $crate::raw::Raw::from($v) ),* ])
    };
}

/// Declares one or more object types as lazily-registered statics
///
/// Each declaration expands to a `pub static ref` (through the crate
/// re-export of `lazy_static`) holding the [`ObjectType`] handle, so that
/// the type is registered the first time it is used and never before.
/// Referring to another declared type inside a body forces its registration
/// first, which makes declaration order within a schema irrelevant.
///
/// # Syntax
///
/// ```text
/// message! {
///     IDENT = "TypeName" [: SUPERTYPE] {
///         content LEAF_TYPE;
///         scalar "fieldName": LEAF_TYPE [{ OPTIONS }];
///         object "fieldName": OBJECT_TYPE [{ OPTIONS }];
///         array "fieldName": ELEMENT_TYPE [{ OPTIONS }];
///     }
///     ...
/// }
/// ```
///
/// where `OPTIONS` is a comma-separated list of `attribute` and
/// `namespace "ns"`. A supertype is snapshotted when the subtype is first
/// used, per [`ObjectType::subtype`].
///
/// # Example
///
/// ```
/// use datatypes::{message, Object, Represent, ReprOptions, Text, Integer};
///
/// message! {
///     AMOUNT = "BasicAmountType" {
///         content Text;
///         scalar "currencyID": Text { attribute };
///     }
///     ERROR = "ErrorType" {
///         scalar "errorCode": Integer;
///         object "amount": AMOUNT { namespace "ebl" };
///         array "messages": Text;
///     }
/// }
///
/// let raw = datatypes::raw_map! {
///     "error_code" => "10",
///     "ebl:amount" => datatypes::raw_map! { "@currencyID" => "USD", "value" => "1.00" },
///     "messages" => "only one",
/// };
/// let err = Object::from_raw(*ERROR, &raw).unwrap();
/// assert_eq!(
///     err.to_representation(&ReprOptions::plain()),
///     datatypes::raw_map! {
///         "errorCode" => 10,
///         "amount" => datatypes::raw_map! { "value" => "1.00", "currencyID" => "USD" },
///         "messages" => vec!["only one"],
///     }
/// );
/// ```
///
/// [`ObjectType`]: crate::registry::ObjectType
/// [`ObjectType::subtype`]: crate::registry::ObjectType::subtype
#[macro_export]
macro_rules! message {
    (@root $tname:literal) => {
        $crate::registry::ObjectType::declare($tname)
    };
    (@root $tname:literal, $sup:path) => {
        $sup.subtype($tname)
    };
    (@opts $o:expr ;) => { $o };
    (@opts $o:expr ; attribute $(, $($rest:tt)*)?) => {
        $crate::message!(@opts $o.attribute() ; $($($rest)*)?)
    };
    (@opts $o:expr ; namespace $ns:literal $(, $($rest:tt)*)?) => {
        $crate::message!(@opts $o.namespace($ns) ; $($($rest)*)?)
    };
    (@kind scalar $o:expr) => { $o };
    (@kind object $o:expr) => { $o };
    (@kind array $o:expr) => { $o.array() };
    (@body $h:ident ;) => {};
    (@body $h:ident ; content $ty:path ; $($rest:tt)*) => {
        $h.content($ty.type_ref());
        $crate::message!(@body $h ; $($rest)*);
    };
    (@body $h:ident ; $kind:ident $name:literal : $ty:path $({ $($opt:tt)* })? ; $($rest:tt)*) => {
        $h.declare_field(
            $name,
            $ty.type_ref(),
            $crate::message!(@kind $kind $crate::message!(
                @opts $crate::registry::FieldOptions::new() ; $($($opt)*)?
            )),
        );
        $crate::message!(@body $h ; $($rest)*);
    };
    (
        $(
            $(#[$meta:meta])*
            $id:ident = $tname:literal $(: $sup:path)? { $($body:tt)* }
        )*
    ) => {
        $crate::lazy_static! {
            $(
                $(#[$meta])*
                pub static ref $id : $crate::registry::ObjectType = {
                    #[allow(unused_imports)]
                    use $crate::registry::Declared as _;
                    let ty = $crate::message!(@root $tname $(, $sup)?);
                    $crate::message!(@body ty ; $($body)*);
                    ty
                };
            )*
        }
    };
}

#[cfg(test)]
mod test {
    use crate::leaf::{Boolean, Integer, Text};
    use crate::object::{Object, Value};
    use crate::raw::Raw;
    use crate::registry::CONTENT_KEY;

    crate::message! {
        MACRO_AMOUNT = "MacroAmount" {
            content Text;
            scalar "currencyID": Text { attribute, namespace "cc" };
        }
        MACRO_BASE = "MacroBase" {
            scalar "id": Integer;
        }
        MACRO_DERIVED = "MacroDerived" : MACRO_BASE {
            scalar "active": Boolean { attribute };
            object "total": MACRO_AMOUNT;
            array "lines": MACRO_AMOUNT { namespace "ebl" };
        }
    }

    #[test]
    fn declared_layout() {
        assert_eq!(MACRO_DERIVED.fields(), vec!["id", "active", "total", "lines"]);
        assert_eq!(MACRO_DERIVED.supertype(), Some(*MACRO_BASE));
        assert!(MACRO_AMOUNT.is_content_type());
        let lines = MACRO_DERIVED.declaration("ebl:lines").unwrap();
        assert!(lines.is_array());
        let cur = MACRO_AMOUNT.declaration("@cc:currencyID").unwrap();
        assert!(cur.is_attribute());
        assert_eq!(cur.namespace(), Some("cc"));
        assert!(MACRO_AMOUNT.declaration(CONTENT_KEY).unwrap().is_content());
    }

    #[test]
    fn build_from_macro_schema() {
        let raw = raw_map! {
            "id" => 3,
            "@active" => "1",
            "total" => "9.99",
            "lines" => raw_seq!["1", raw_map! { "value" => "2", "cc:currencyID" => "EUR" }],
        };
        let obj = Object::from_raw(*MACRO_DERIVED, &raw).unwrap();
        let total = obj.peek("total").and_then(Value::as_object).unwrap();
        assert_eq!(total.peek(CONTENT_KEY).and_then(Value::as_str), Some("9.99"));
        let lines = obj.peek("lines").and_then(Value::as_array).unwrap();
        assert_eq!(lines.len(), 2);
        let second = lines.peek(1).and_then(Value::as_object).unwrap();
        assert_eq!(second.peek("currency_id").and_then(Value::as_str), Some("EUR"));
    }

    #[test]
    fn raw_builders() {
        let seq = raw_seq![1, "two", Raw::Null];
        assert_eq!(seq, Raw::from(vec![Raw::from(1), Raw::from("two"), Raw::Null]));
        assert_eq!(raw_map! {}, Raw::empty_mapping());
        assert_ne!(raw_map!(sym { "a" => 1 }), raw_map! { "a" => 1 });
    }
}
