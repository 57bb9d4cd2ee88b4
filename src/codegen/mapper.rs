//! Attribute Type Mapping
//!
//! Maps one attribute to its nested and flattened TypeScript types. Every
//! kind family has its own small function; [`map_attribute`] only dispatches.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{Attribute, AttributeKind};

use super::imports::ImportNeed;
use super::names::{Reference, ReferenceResolver};

const TEXT: &str = "string";
const NUMBER: &str = "number";
const BOOLEAN: &str = "boolean";
const DATE: &str = "Date";
const ANY: &str = "any";
const NEVER: &str = "never";

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Result of mapping one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedProperty {
    /// Property key, quoted if needed and with `?` when optional
    pub key: String,
    /// Type in the nested declaration
    pub nested: String,
    /// Type in the flattened declaration
    pub flat: String,
    /// Import this property needs, if it references another file
    pub import: Option<ImportNeed>,
}

impl MappedProperty {
    pub fn nested_line(&self) -> String {
        format!("{}: {};", self.key, self.nested)
    }

    pub fn flat_line(&self) -> String {
        format!("{}: {};", self.key, self.flat)
    }
}

/// Nested/flat type pair before the key is attached
#[derive(Debug, Clone, PartialEq, Eq)]
struct MappedType {
    nested: String,
    flat: String,
    import: Option<ImportNeed>,
}

impl MappedType {
    fn same(ts_type: impl Into<String>) -> Self {
        let ts_type = ts_type.into();
        Self {
            nested: ts_type.clone(),
            flat: ts_type,
            import: None,
        }
    }
}

/// Map an attribute; `None` means the attribute is left out entirely
pub fn map_attribute(
    name: &str,
    attribute: &Attribute,
    resolver: &ReferenceResolver,
) -> Option<MappedProperty> {
    let mapped = match &attribute.kind {
        AttributeKind::Password => return None,
        AttributeKind::Relation { relation, target } => match target {
            Some(target) => map_relation(resolver.relation(target), relation.is_to_many()),
            None => MappedType::same(ANY),
        },
        AttributeKind::Component {
            component,
            repeatable,
        } => map_component(resolver.component(component), *repeatable),
        AttributeKind::Media { multiple } => map_relation(resolver.media(), *multiple),
        AttributeKind::Enumeration { options } => MappedType::same(enum_union(options)),
        AttributeKind::String
        | AttributeKind::Text
        | AttributeKind::RichText
        | AttributeKind::Email
        | AttributeKind::Uid => MappedType::same(TEXT),
        AttributeKind::Integer
        | AttributeKind::BigInteger
        | AttributeKind::Decimal
        | AttributeKind::Float => MappedType::same(NUMBER),
        AttributeKind::Date | AttributeKind::DateTime | AttributeKind::Time => map_temporal(),
        AttributeKind::Boolean => MappedType::same(BOOLEAN),
        AttributeKind::Json | AttributeKind::Unrecognized => MappedType::same(ANY),
    };

    Some(MappedProperty {
        key: property_key(name, attribute.is_optional()),
        nested: mapped.nested,
        flat: mapped.flat,
        import: mapped.import,
    })
}

fn array_suffix(many: bool) -> &'static str {
    if many {
        "[]"
    } else {
        ""
    }
}

/// Relations and media are wrapped in a `data` envelope in the nested view
fn map_relation(reference: Reference, many: bool) -> MappedType {
    let suffix = array_suffix(many);
    MappedType {
        nested: format!("{{ data: {}{} }}", reference.nested, suffix),
        flat: format!("{}{}", reference.flat, suffix),
        import: Some(reference.import),
    }
}

/// Components are embedded without an envelope
fn map_component(reference: Reference, repeatable: bool) -> MappedType {
    let suffix = array_suffix(repeatable);
    MappedType {
        nested: format!("{}{}", reference.nested, suffix),
        flat: format!("{}{}", reference.flat, suffix),
        import: Some(reference.import),
    }
}

/// Temporals arrive serialized as text in the flattened shape
fn map_temporal() -> MappedType {
    MappedType {
        nested: DATE.to_string(),
        flat: TEXT.to_string(),
        import: None,
    }
}

fn enum_union(options: &[String]) -> String {
    if options.is_empty() {
        return NEVER.to_string();
    }
    options
        .iter()
        .map(|option| quoted(option))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Single-quoted string literal; backslashes are escaped before quotes
fn quoted(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn property_key(name: &str, optional: bool) -> String {
    let mut key = if IDENTIFIER.is_match(name) {
        name.to_string()
    } else {
        quoted(name)
    };
    if optional {
        key.push('?');
    }
    key
}
