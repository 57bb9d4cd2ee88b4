//! Schema Discovery
//!
//! Finds entity and component schema files under a project root:
//!
//! ```text
//! src/
//! ├── api/
//! │   └── article/content-types/article/schema.json   (entity)
//! └── components/
//!     └── shared/
//!         ├── seo.json                                (component)
//!         └── link.json
//! ```
//!
//! Missing directories are not errors; they just contribute nothing.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::codegen::Variant;
use crate::config::TypegenConfig;

/// A schema file to convert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaFile {
    pub path: PathBuf,
    #[serde(skip)]
    pub variant: Variant,
    /// Component category folder (components only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Everything found under a project root, in deterministic order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Discovered {
    pub entities: Vec<SchemaFile>,
    pub components: Vec<SchemaFile>,
}

impl Discovered {
    pub fn len(&self) -> usize {
        self.entities.len() + self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Discover all schema files for a project
pub fn discover(root: &Path, config: &TypegenConfig) -> Discovered {
    let entities = entity_schemas(&config.api_dir(root), config.include_paths(root));
    let components = component_schemas(&config.components_dir(root));

    info!(
        entities = entities.len(),
        components = components.len(),
        "discovered schemas"
    );

    Discovered {
        entities,
        components,
    }
}

/// `<api_dir>/<name>/content-types/<name>/schema.json` for every visible folder,
/// followed by the extra include paths; paths that do not exist are dropped
pub fn entity_schemas(api_dir: &Path, include: Vec<PathBuf>) -> Vec<SchemaFile> {
    let mut paths = Vec::new();

    if api_dir.is_dir() {
        for entry in WalkDir::new(api_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') || !entry.file_type().is_dir() {
                continue;
            }
            paths.push(
                entry
                    .path()
                    .join("content-types")
                    .join(name.as_ref())
                    .join("schema.json"),
            );
        }
    } else {
        info!(path = %api_dir.display(), "no API types found, skipping");
    }

    paths.extend(include);

    paths
        .into_iter()
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                debug!(path = %path.display(), "schema file not found, ignoring");
            }
            exists
        })
        .map(|path| SchemaFile {
            path,
            variant: Variant::Entity,
            category: None,
        })
        .collect()
}

/// `<components_dir>/<category>/<name>.json`
pub fn component_schemas(components_dir: &Path) -> Vec<SchemaFile> {
    if !components_dir.is_dir() {
        info!(path = %components_dir.display(), "no component types found, skipping");
        return Vec::new();
    }

    WalkDir::new(components_dir)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .map(|entry| {
            let category = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|c| c.to_string_lossy().into_owned());
            SchemaFile {
                path: entry.into_path(),
                variant: Variant::Component,
                category,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_entity_layout() {
        let dir = tempdir().unwrap();
        let api = dir.path().join("src/api");
        touch(&api.join("tag/content-types/tag/schema.json"));
        touch(&api.join("article/content-types/article/schema.json"));
        // folder without a schema, and a hidden folder
        fs::create_dir_all(api.join("health")).unwrap();
        touch(&api.join(".cache/content-types/.cache/schema.json"));

        let found = entity_schemas(&api, Vec::new());
        let names: Vec<String> = found
            .iter()
            .map(|s| s.path.strip_prefix(&api).unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            names,
            vec![
                "article/content-types/article/schema.json",
                "tag/content-types/tag/schema.json",
            ]
        );
        assert!(found.iter().all(|s| s.variant == Variant::Entity));
    }

    #[test]
    fn test_include_paths_filtered() {
        let dir = tempdir().unwrap();
        let extra = dir.path().join("plugins/blog/schema.json");
        touch(&extra);

        let found = entity_schemas(
            &dir.path().join("src/api"),
            vec![extra.clone(), dir.path().join("missing.json")],
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, extra);
    }

    #[test]
    fn test_component_layout() {
        let dir = tempdir().unwrap();
        let components = dir.path().join("src/components");
        touch(&components.join("shared/seo.json"));
        touch(&components.join("shared/link.json"));
        touch(&components.join("blocks/hero.json"));
        touch(&components.join("blocks/README.md"));
        touch(&components.join("stray.json"));

        let found = component_schemas(&components);
        let summary: Vec<(String, String)> = found
            .iter()
            .map(|s| {
                (
                    s.category.clone().unwrap(),
                    s.path.file_name().unwrap().to_string_lossy().into_owned(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("blocks".to_string(), "hero.json".to_string()),
                ("shared".to_string(), "link.json".to_string()),
                ("shared".to_string(), "seo.json".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_directories() {
        let dir = tempdir().unwrap();
        let found = discover(dir.path(), &TypegenConfig::default());
        assert!(found.is_empty());
    }
}
