//! Alternate spellings of canonical field names
//!
//! Wire formats disagree on how a field should be keyed: the canonical
//! camel-case name, a lowercase form with word separators, a form qualified
//! by an XML namespace prefix, or a form marked as an XML attribute. The
//! functions in this module compute each of these spellings from a canonical
//! name. They hold no state.

/// Prefix marking a key as an attribute of its enclosing element
pub const ATTRIBUTE_MARKER: char = '@';

/// Separator between a namespace prefix and a field name
pub const NAMESPACE_SEPARATOR: char = ':';

/// Separator inserted at word boundaries by [`to_separated_lowercase`]
pub const WORD_SEPARATOR: char = '_';

/// Converts a camel-case name into lowercase words joined by [`WORD_SEPARATOR`].
///
/// A boundary is inserted before an ASCII uppercase letter when either:
///   1. the preceding character is an ASCII lowercase letter; or
///   2. the preceding character is an ASCII uppercase letter and the
///      following character is an ASCII lowercase letter.
///
/// The result is then lowercased in its entirety. Digits and other
/// characters never introduce a boundary on their own.
///
/// ```
/// use datatypes::names::to_separated_lowercase;
///
/// assert_eq!(to_separated_lowercase("baseAmountList"), "base_amount_list");
/// assert_eq!(to_separated_lowercase("HTTPSubCode"), "http_sub_code");
/// assert_eq!(to_separated_lowercase("ID"), "id");
/// ```
#[must_use]
pub fn to_separated_lowercase(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let lower_to_upper = prev.is_ascii_lowercase();
            let acronym_end =
                prev.is_ascii_uppercase() && next.map_or(false, |n| n.is_ascii_lowercase());
            if lower_to_upper || acronym_end {
                out.push(WORD_SEPARATOR);
            }
        }
        out.push(c);
    }
    out.to_lowercase()
}

/// Marks a name as an attribute key, e.g. `currencyID` to `@currencyID`
#[must_use]
pub fn attribute_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    out.push(ATTRIBUTE_MARKER);
    out.push_str(name);
    out
}

/// Qualifies a name by a namespace prefix, e.g. `amount` in `ebl` to `ebl:amount`
#[must_use]
pub fn namespaced_key(namespace: &str, name: &str) -> String {
    let mut out = String::with_capacity(namespace.len() + name.len() + 1);
    out.push_str(namespace);
    out.push(NAMESPACE_SEPARATOR);
    out.push_str(name);
    out
}

/// Combination of [`namespaced_key`] and [`attribute_key`], e.g. `@ebl:amount`
#[must_use]
pub fn namespaced_attribute_key(namespace: &str, name: &str) -> String {
    attribute_key(&namespaced_key(namespace, name))
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn separated_lowercase() {
        assert_eq!(to_separated_lowercase("baseAmountList"), "base_amount_list");
        assert_eq!(to_separated_lowercase("errorCode"), "error_code");
        assert_eq!(to_separated_lowercase("HTTPSubCode"), "http_sub_code");
        assert_eq!(to_separated_lowercase("HTTPCode"), "http_code");
        assert_eq!(to_separated_lowercase("currencyID"), "currency_id");
        assert_eq!(to_separated_lowercase("HTTP"), "http");
        assert_eq!(to_separated_lowercase("Amount"), "amount");
        assert_eq!(to_separated_lowercase("value"), "value");
        assert_eq!(to_separated_lowercase("address2Line"), "address2line");
        assert_eq!(to_separated_lowercase(""), "");
    }

    #[test]
    fn decorated_keys() {
        assert_eq!(attribute_key("currencyID"), "@currencyID");
        assert_eq!(namespaced_key("ebl", "amount"), "ebl:amount");
        assert_eq!(namespaced_attribute_key("ebl", "amount"), "@ebl:amount");
    }

    proptest! {
        #[test]
        fn lowercase_names_unchanged(name in "[a-z][a-z0-9_]{0,24}") {
            prop_assert_eq!(to_separated_lowercase(&name), name);
        }

        #[test]
        fn only_separators_added(name in "[a-zA-Z][a-zA-Z0-9]{0,24}") {
            let mapped = to_separated_lowercase(&name);
            let stripped: String = mapped.chars().filter(|&c| c != WORD_SEPARATOR).collect();
            prop_assert_eq!(stripped, name.to_lowercase());
        }

        #[test]
        fn idempotent(name in "[a-zA-Z][a-zA-Z0-9]{0,24}") {
            let once = to_separated_lowercase(&name);
            prop_assert_eq!(to_separated_lowercase(&once), once.clone());
        }
    }
}
