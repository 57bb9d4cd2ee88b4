//! TypeScript Interface Emitter
//!
//! Folds a schema's attributes through the type mapper into one
//! [`GeneratedUnit`]. All state (property buffers, import registry) lives in
//! a single `emit` call.

use std::collections::HashSet;

use tracing::debug;

use crate::schema::{Attribute, AttributeKind};

use super::imports::ImportRegistry;
use super::mapper::map_attribute;
use super::names::{ReferenceResolver, MEDIA_TYPE};
use super::{GeneratedUnit, Variant};

/// Emits the nested and flattened interfaces for one schema
pub struct InterfaceEmitter {
    variant: Variant,
    name: String,
}

impl InterfaceEmitter {
    pub fn new(variant: Variant, name: impl Into<String>) -> Self {
        Self {
            variant,
            name: name.into(),
        }
    }

    pub fn emit(&self, attributes: &[(String, Attribute)]) -> GeneratedUnit {
        let resolver =
            ReferenceResolver::new(self.variant).with_taken_names(self.taken_names(attributes));
        let mut imports = ImportRegistry::new();
        let mut nested = Vec::with_capacity(attributes.len());
        let mut flat = Vec::with_capacity(attributes.len());
        let own_path = self.variant.own_path(&self.name);

        for (attribute_name, attribute) in attributes {
            let Some(property) = map_attribute(attribute_name, attribute, &resolver) else {
                debug!(interface = %self.name, attribute = %attribute_name, "omitting password attribute");
                continue;
            };

            if let Some(import) = &property.import {
                // self-references resolve to the declaration in this file
                if import.path != own_path {
                    imports.register(import.clone());
                }
            }

            nested.push(property.nested_line());
            flat.push(property.flat_line());
        }

        GeneratedUnit {
            variant: self.variant,
            name: self.name.clone(),
            imports: imports.into_imports(),
            nested,
            flat,
        }
    }

    /// Type names bound in the file before any component is imported
    fn taken_names(&self, attributes: &[(String, Attribute)]) -> HashSet<String> {
        let base = ReferenceResolver::new(self.variant);
        let mut names = HashSet::new();
        if self.variant == Variant::Entity {
            names.insert(self.name.clone());
        }

        for (_, attribute) in attributes {
            match &attribute.kind {
                AttributeKind::Relation {
                    target: Some(target),
                    ..
                } => {
                    names.insert(base.relation(target).nested);
                }
                AttributeKind::Media { .. } => {
                    names.insert(MEDIA_TYPE.to_string());
                }
                _ => {}
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ContentSchema;

    fn attributes(json: &str) -> Vec<(String, Attribute)> {
        ContentSchema::from_json(json).unwrap().attributes
    }

    #[test]
    fn test_fold_keeps_order_and_skips_password() {
        let attrs = attributes(
            r#"{"attributes": {
                "title": {"type": "string"},
                "secret": {"type": "password"},
                "views": {"type": "integer"}
            }}"#,
        );
        let unit = InterfaceEmitter::new(Variant::Entity, "Article").emit(&attrs);

        assert_eq!(unit.nested, vec!["title: string;", "views: number;"]);
        assert_eq!(unit.flat, vec!["title: string;", "views: number;"]);
        assert!(unit.imports.is_empty());
    }

    #[test]
    fn test_shared_path_imported_once() {
        let attrs = attributes(
            r#"{"attributes": {
                "cover": {"type": "media"},
                "gallery": {"type": "media", "multiple": true},
                "author": {"type": "relation", "relation": "manyToOne", "target": "admin::user"},
                "editor": {"type": "relation", "relation": "manyToOne", "target": "plugin::users-permissions.user"}
            }}"#,
        );
        let unit = InterfaceEmitter::new(Variant::Entity, "Article").emit(&attrs);

        let paths: Vec<&str> = unit.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["./Media", "./User"]);
    }

    #[test]
    fn test_self_reference_not_imported() {
        let attrs = attributes(
            r#"{"attributes": {
                "related": {"type": "relation", "relation": "manyToMany", "target": "api::article.article"}
            }}"#,
        );
        let unit = InterfaceEmitter::new(Variant::Entity, "Article").emit(&attrs);

        assert!(unit.imports.is_empty());
        assert_eq!(unit.nested, vec!["related: { data: Article[] };"]);
        assert_eq!(unit.flat, vec!["related: CM_Article[];"]);
    }

    #[test]
    fn test_component_clashing_with_relation_aliased() {
        let attrs = attributes(
            r#"{"attributes": {
                "tags": {"type": "relation", "relation": "oneToMany", "target": "api::tag.tag"},
                "badge": {"type": "component", "component": "shared.tag"}
            }}"#,
        );
        let unit = InterfaceEmitter::new(Variant::Entity, "Article").emit(&attrs);

        let statements: Vec<String> = unit.imports.iter().map(|i| i.statement()).collect();
        assert_eq!(
            statements,
            vec![
                "import { Tag, CM_Tag } from './Tag';",
                "import { Tag as TagComponent, CM_Tag as CM_TagComponent } from './components/Tag';",
            ]
        );
        assert_eq!(unit.nested, vec!["tags: { data: Tag[] };", "badge: TagComponent;"]);
        assert_eq!(unit.flat, vec!["tags: CM_Tag[];", "badge: CM_TagComponent;"]);
    }

    #[test]
    fn test_component_named_like_entity_aliased() {
        let attrs = attributes(r#"{"attributes": {"meta": {"type": "component", "component": "shared.seo"}}}"#);
        let unit = InterfaceEmitter::new(Variant::Entity, "Seo").emit(&attrs);

        assert_eq!(unit.nested, vec!["meta: SeoComponent;"]);
        assert_eq!(
            unit.imports[0].statement(),
            "import { Seo as SeoComponent, CM_Seo as CM_SeoComponent } from './components/Seo';"
        );
    }

    #[test]
    fn test_component_self_reference_not_aliased() {
        let attrs = attributes(
            r#"{"attributes": {"children": {"type": "component", "component": "menu.item", "repeatable": true}}}"#,
        );
        let unit = InterfaceEmitter::new(Variant::Component, "Item").emit(&attrs);

        assert!(unit.imports.is_empty());
        assert_eq!(unit.nested, vec!["children: Item[];"]);
    }
}
