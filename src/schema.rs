//! Content-type schema model
//!
//! A schema document is an ordered map of attribute name to attribute definition.
//! Entity schemas also carry an `info` block whose `singularName` names the
//! generated interface; component schemas are named after their file.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Display metadata of an entity schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaInfo {
    #[serde(default)]
    pub singular_name: Option<String>,
    #[serde(default)]
    pub plural_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A parsed schema document
#[derive(Debug, Clone, Deserialize)]
pub struct ContentSchema {
    #[serde(default)]
    pub info: Option<SchemaInfo>,

    /// Attributes in document order
    #[serde(deserialize_with = "ordered_attributes")]
    pub attributes: Vec<(String, Attribute)>,
}

impl ContentSchema {
    /// Parse a schema document from JSON text
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// The entity's singular name, if present and non-empty
    pub fn singular_name(&self) -> Option<&str> {
        self.info
            .as_ref()
            .and_then(|info| info.singular_name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

fn ordered_attributes<'de, D>(deserializer: D) -> Result<Vec<(String, Attribute)>, D::Error>
where
    D: Deserializer<'de>,
{
    // preserve_order keeps the map in document order
    let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
    map.into_iter()
        .map(|(name, value)| {
            Attribute::from_value(value)
                .map(|attribute| (name, attribute))
                .map_err(D::Error::custom)
        })
        .collect()
}

/// One attribute of a schema
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub kind: AttributeKind,
    /// The schema's own `required` flag, when present
    pub required: Option<bool>,
}

impl Attribute {
    pub fn new(kind: AttributeKind) -> Self {
        Self { kind, required: None }
    }

    /// Builder-style setter used mostly by tests
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Read an attribute from its JSON form.
    ///
    /// A missing or non-string `type` tag yields [`AttributeKind::Unrecognized`]
    /// rather than an error; only a known kind with malformed fields fails.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let required = value.get("required").and_then(Value::as_bool);
        let kind = if value.get("type").is_some_and(Value::is_string) {
            AttributeKind::deserialize(value)?
        } else {
            AttributeKind::Unrecognized
        };
        Ok(Self { kind, required })
    }

    /// Optional iff the schema explicitly says `"required": false`
    pub fn is_optional(&self) -> bool {
        self.required == Some(false)
    }
}

impl<'de> Deserialize<'de> for Attribute {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

/// Closed set of attribute kinds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AttributeKind {
    Relation {
        #[serde(default)]
        relation: RelationArity,
        /// Absent for polymorphic relations
        #[serde(default)]
        target: Option<String>,
    },
    Component {
        component: String,
        #[serde(default)]
        repeatable: bool,
    },
    Media {
        #[serde(default)]
        multiple: bool,
    },
    Enumeration {
        #[serde(rename = "enum", default)]
        options: Vec<String>,
    },
    String,
    Text,
    RichText,
    Email,
    Uid,
    Json,
    Password,
    Integer,
    BigInteger,
    Decimal,
    Float,
    Date,
    DateTime,
    Time,
    Boolean,
    #[serde(other)]
    Unrecognized,
}

impl AttributeKind {
    /// Schema-facing name of the kind, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relation { .. } => "relation",
            Self::Component { .. } => "component",
            Self::Media { .. } => "media",
            Self::Enumeration { .. } => "enumeration",
            Self::String => "string",
            Self::Text => "text",
            Self::RichText => "richtext",
            Self::Email => "email",
            Self::Uid => "uid",
            Self::Json => "json",
            Self::Password => "password",
            Self::Integer => "integer",
            Self::BigInteger => "biginteger",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Boolean => "boolean",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Relation cardinality as written in the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationArity {
    #[default]
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    OneWay,
    ManyWay,
    MorphToOne,
    MorphToMany,
    MorphOne,
    MorphMany,
    #[serde(other)]
    Other,
}

impl RelationArity {
    /// Whether the related side is a collection
    pub fn is_to_many(self) -> bool {
        matches!(
            self,
            Self::OneToMany | Self::ManyToMany | Self::ManyWay | Self::MorphToMany | Self::MorphMany
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_order_preserved() {
        let schema = ContentSchema::from_json(
            r#"{"attributes": {"zeta": {"type": "string"}, "alpha": {"type": "integer"}, "mid": {"type": "boolean"}}}"#,
        )
        .unwrap();

        let names: Vec<&str> = schema.attributes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_relation_fields() {
        let attribute = Attribute::from_value(json!({
            "type": "relation",
            "relation": "oneToMany",
            "target": "api::tag.tag",
            "mappedBy": "article"
        }))
        .unwrap();

        assert_eq!(
            attribute.kind,
            AttributeKind::Relation {
                relation: RelationArity::OneToMany,
                target: Some("api::tag.tag".to_string()),
            }
        );
        assert_eq!(attribute.required, None);
    }

    #[test]
    fn test_unknown_kind_is_unrecognized() {
        let attribute = Attribute::from_value(json!({"type": "dynamiczone", "components": ["a.b"]})).unwrap();
        assert_eq!(attribute.kind, AttributeKind::Unrecognized);

        let untagged = Attribute::from_value(json!({"required": true})).unwrap();
        assert_eq!(untagged.kind, AttributeKind::Unrecognized);
        assert_eq!(untagged.required, Some(true));
    }

    #[test]
    fn test_kind_tags() {
        let cases = [
            ("richtext", AttributeKind::RichText),
            ("biginteger", AttributeKind::BigInteger),
            ("datetime", AttributeKind::DateTime),
            ("uid", AttributeKind::Uid),
            ("password", AttributeKind::Password),
        ];
        for (tag, expected) in cases {
            let attribute = Attribute::from_value(json!({ "type": tag })).unwrap();
            assert_eq!(attribute.kind, expected, "tag {tag}");
        }
    }

    #[test]
    fn test_optional_flag() {
        let optional = Attribute::from_value(json!({"type": "string", "required": false})).unwrap();
        let required = Attribute::from_value(json!({"type": "string", "required": true})).unwrap();
        let unspecified = Attribute::from_value(json!({"type": "string"})).unwrap();

        assert!(optional.is_optional());
        assert!(!required.is_optional());
        assert!(!unspecified.is_optional());
    }

    #[test]
    fn test_component_without_path_fails() {
        assert!(Attribute::from_value(json!({"type": "component", "repeatable": true})).is_err());
        assert!(ContentSchema::from_json(r#"{"attributes": {"seo": {"type": "component"}}}"#).is_err());
    }

    #[test]
    fn test_missing_attributes_fails() {
        assert!(ContentSchema::from_json(r#"{"info": {"singularName": "tag"}}"#).is_err());
        assert!(ContentSchema::from_json("not json").is_err());
    }

    #[test]
    fn test_singular_name() {
        let schema = ContentSchema::from_json(
            r#"{"info": {"singularName": "blog-post", "pluralName": "blog-posts"}, "attributes": {}}"#,
        )
        .unwrap();
        assert_eq!(schema.singular_name(), Some("blog-post"));

        let blank = ContentSchema::from_json(r#"{"info": {"singularName": " "}, "attributes": {}}"#).unwrap();
        assert_eq!(blank.singular_name(), None);
    }

    #[test]
    fn test_to_many_arity() {
        assert!(RelationArity::OneToMany.is_to_many());
        assert!(RelationArity::ManyToMany.is_to_many());
        assert!(!RelationArity::ManyToOne.is_to_many());
        assert!(!RelationArity::OneToOne.is_to_many());
        assert!(!RelationArity::Other.is_to_many());
    }
}
