//! Shaping of field keys in serialized output

use super::ReprOptions;
use crate::names::{attribute_key, namespaced_attribute_key, namespaced_key};
use crate::raw::Key;
use crate::registry::FieldDeclaration;

/// Computes the key under which a field is written, according to `opts`.
///
/// The namespace is applied before the attribute marker, so a field that is
/// both yields `@ns:name`. The content field is always written under its
/// bare canonical name.
#[must_use]
pub fn field_key(decl: &FieldDeclaration, opts: &ReprOptions) -> Key {
    let text = if decl.is_content() {
        decl.name().to_owned()
    } else {
        let ns = decl.namespace().filter(|_| opts.namespace);
        let attr = decl.is_attribute() && opts.attribute;
        match (attr, ns) {
            (true, Some(ns)) => namespaced_attribute_key(ns, decl.name()),
            (true, None) => attribute_key(decl.name()),
            (false, Some(ns)) => namespaced_key(ns, decl.name()),
            (false, None) => decl.name().to_owned(),
        }
    };
    if opts.symbolic_keys {
        Key::Symbol(text)
    } else {
        Key::Str(text)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::leaf::Text;
    use crate::registry::{FieldOptions, ObjectType, CONTENT_KEY};

    #[test]
    fn decoration() {
        let ty = ObjectType::declare("KeyShaping");
        ty.content(Text)
            .scalar("amount", Text, FieldOptions::new().attribute().namespace("ebl"))
            .scalar("plain", Text, FieldOptions::new().namespace("ebl"));
        let amount = ty.declaration("amount").unwrap();
        let plain = ty.declaration("plain").unwrap();
        let content = ty.declaration(CONTENT_KEY).unwrap();

        let full = ReprOptions::default();
        assert_eq!(field_key(&amount, &full), Key::symbol("@ebl:amount"));
        assert_eq!(field_key(&plain, &full), Key::symbol("ebl:plain"));
        assert_eq!(field_key(&content, &full), Key::symbol("value"));

        let no_ns = ReprOptions::default().namespace(false).symbolic_keys(false);
        assert_eq!(field_key(&amount, &no_ns), Key::string("@amount"));
        assert_eq!(field_key(&plain, &no_ns), Key::string("plain"));

        let no_attr = ReprOptions::default().attribute(false);
        assert_eq!(field_key(&amount, &no_attr), Key::symbol("ebl:amount"));

        assert_eq!(field_key(&amount, &ReprOptions::plain()), Key::string("amount"));
    }
}
