//! Name Resolution
//!
//! Turns relation targets and component paths into TypeScript type names,
//! and picks the import path each referenced type lives at.
//!
//! Entity files sit in the output root and component files one level down in
//! `components/`, so the same reference resolves to different relative paths
//! depending on which [`Variant`] is being generated.

use std::collections::HashSet;

use super::imports::{ImportNeed, ImportSymbol};
use super::{Variant, FLAT_PREFIX};

/// Fixed name for the account entity owned by the auth plugin
pub const USER_TYPE: &str = "User";

/// Fixed name for uploaded files
pub const MEDIA_TYPE: &str = "Media";

/// Relation targets that denote the built-in account entity
const USER_TARGETS: &[&str] = &["plugin::users-permissions.user", "admin::user"];

/// Whether a relation target is the built-in account entity
pub fn is_user_target(target: &str) -> bool {
    USER_TARGETS.contains(&target)
}

/// Type name for a schema uid such as `api::tag.tag` or `shared.seo-meta`
pub fn type_name_for_uid(uid: &str) -> String {
    to_pascal_case(last_segment(uid))
}

/// Last `.`-separated segment, after any `namespace::` prefix
fn last_segment(uid: &str) -> &str {
    let local = uid.rsplit("::").next().unwrap_or(uid);
    local.rsplit('.').next().unwrap_or(local)
}

/// Convert to PascalCase (`blog-post`, `blog_post` and `blogPost` all give `BlogPost`)
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

// =============================================================================
// Reference
// =============================================================================

/// A resolved cross-file type reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Name of the nested type as visible inside the generated file
    pub nested: String,
    /// Name of the flattened type as visible inside the generated file
    pub flat: String,
    /// The single combined import bringing both names into scope
    pub import: ImportNeed,
}

impl Reference {
    fn direct(name: String, path: String) -> Self {
        let flat = format!("{FLAT_PREFIX}{name}");
        let import = ImportNeed::new(
            path,
            vec![ImportSymbol::plain(name.clone()), ImportSymbol::plain(flat.clone())],
        );
        Self {
            nested: name,
            flat,
            import,
        }
    }

    fn aliased(name: String, alias: String, path: String) -> Self {
        let flat_alias = format!("{FLAT_PREFIX}{alias}");
        let import = ImportNeed::new(
            path,
            vec![
                ImportSymbol::aliased(name.clone(), alias.clone()),
                ImportSymbol::aliased(format!("{FLAT_PREFIX}{name}"), flat_alias.clone()),
            ],
        );
        Self {
            nested: alias,
            flat: flat_alias,
            import,
        }
    }
}

// =============================================================================
// Reference Resolver
// =============================================================================

/// Resolves relation, component and media references for one variant
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    variant: Variant,
    /// Names already bound in the file by the declaration, relations or media
    taken: HashSet<String>,
}

impl ReferenceResolver {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            taken: HashSet::new(),
        }
    }

    /// Components whose name is in `names` are imported under a `Component` alias
    pub fn with_taken_names(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.taken.extend(names);
        self
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Resolve a relation target to an entity type.
    ///
    /// Inside component files entity types are aliased with an `Entity`
    /// suffix so they cannot shadow a component of the same name.
    pub fn relation(&self, target: &str) -> Reference {
        let name = if is_user_target(target) {
            USER_TYPE.to_string()
        } else {
            type_name_for_uid(target)
        };
        let path = format!("{}{}", self.variant.entity_dir(), name);

        match self.variant {
            Variant::Entity => Reference::direct(name, path),
            Variant::Component => {
                let alias = format!("{name}Entity");
                Reference::aliased(name, alias, path)
            }
        }
    }

    /// Resolve a component path such as `shared.seo`
    pub fn component(&self, component: &str) -> Reference {
        let name = type_name_for_uid(component);
        let path = format!("{}{}", self.variant.component_dir(), name);
        if self.taken.contains(&name) {
            let alias = format!("{name}Component");
            Reference::aliased(name, alias, path)
        } else {
            Reference::direct(name, path)
        }
    }

    /// Resolve the media type
    pub fn media(&self) -> Reference {
        let path = format!("{}{}", self.variant.entity_dir(), MEDIA_TYPE);
        Reference::direct(MEDIA_TYPE.to_string(), path)
    }
}
