//! Code Generation
//!
//! Converts one content-type schema into TypeScript declarations.
//!
//! Architecture:
//! - names: resolves referenced type names and their import paths
//! - mapper: maps a single attribute to nested/flat type text
//! - imports: per-conversion import accumulator, keyed by path
//! - typescript: folds the attributes into a [`GeneratedUnit`]
//! - boilerplate: fixed support types written once per run
//!
//! Each conversion is self-contained; nothing is shared between calls.

pub mod boilerplate;
pub mod imports;
pub mod mapper;
pub mod names;
pub mod typescript;

use std::fs;
use std::path::Path;

use crate::error::{Result, TypegenError};
use crate::schema::ContentSchema;

pub use imports::{ImportNeed, ImportRegistry, ImportSymbol};
pub use mapper::{map_attribute, MappedProperty};
pub use names::{Reference, ReferenceResolver};
pub use typescript::InterfaceEmitter;

/// Name prefix of the flattened declaration
pub const FLAT_PREFIX: &str = "CM_";

// =============================================================================
// Variant
// =============================================================================

/// Which kind of schema is being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Content type, written to the output root
    Entity,
    /// Reusable component, written to `components/`
    Component,
}

impl Variant {
    /// Relative directory of entity files (and Media/User) from this variant's files
    pub fn entity_dir(self) -> &'static str {
        match self {
            Variant::Entity => "./",
            Variant::Component => "../",
        }
    }

    /// Relative directory of component files from this variant's files
    pub fn component_dir(self) -> &'static str {
        match self {
            Variant::Entity => "./components/",
            Variant::Component => "./",
        }
    }

    /// The import path that would point at the file being generated
    pub fn own_path(self, name: &str) -> String {
        match self {
            Variant::Entity => format!("{}{}", self.entity_dir(), name),
            Variant::Component => format!("{}{}", self.component_dir(), name),
        }
    }
}

// =============================================================================
// Generated Output
// =============================================================================

/// Output of one schema conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub variant: Variant,
    /// Interface name of the nested declaration
    pub name: String,
    /// Deduplicated imports in discovery order
    pub imports: Vec<ImportNeed>,
    /// Nested property lines, without indentation
    pub nested: Vec<String>,
    /// Flattened property lines, without indentation
    pub flat: Vec<String>,
}

impl GeneratedUnit {
    /// Name of the flattened declaration
    pub fn flat_name(&self) -> String {
        format!("{FLAT_PREFIX}{}", self.name)
    }

    /// File name this unit is written to
    pub fn file_name(&self) -> String {
        format!("{}.ts", self.name)
    }

    /// Render imports, the nested interface and the flattened interface
    pub fn render(&self) -> String {
        let mut output = String::new();

        for import in &self.imports {
            output.push_str(&import.statement());
            output.push('\n');
        }
        if !self.imports.is_empty() {
            output.push('\n');
        }

        output.push_str(&format!("export interface {} {{\n", self.name));
        output.push_str("  id: number;\n");
        match self.variant {
            Variant::Entity => {
                output.push_str("  attributes: {\n");
                for line in &self.nested {
                    output.push_str(&format!("    {line}\n"));
                }
                output.push_str("  }\n");
            }
            Variant::Component => {
                for line in &self.nested {
                    output.push_str(&format!("  {line}\n"));
                }
            }
        }
        output.push_str("}\n\n");

        output.push_str(&format!("export interface {} {{\n", self.flat_name()));
        for line in &self.flat {
            output.push_str(&format!("  {line}\n"));
        }
        output.push_str("}\n");

        output
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Generate declarations for an entity schema; the name comes from `info.singularName`
pub fn generate_entity(source: &str) -> Result<GeneratedUnit> {
    let schema = ContentSchema::from_json(source)?;
    let name = schema
        .singular_name()
        .map(names::to_pascal_case)
        .ok_or_else(|| TypegenError::MissingInfo("<inline>".to_string()))?;
    Ok(InterfaceEmitter::new(Variant::Entity, name).emit(&schema.attributes))
}

/// Generate declarations for a component schema named after its file stem
pub fn generate_component(source: &str, file_stem: &str) -> Result<GeneratedUnit> {
    let schema = ContentSchema::from_json(source)?;
    let name = names::to_pascal_case(file_stem);
    Ok(InterfaceEmitter::new(Variant::Component, name).emit(&schema.attributes))
}

/// Read and convert an entity schema file
pub fn generate_entity_file(path: &Path) -> Result<GeneratedUnit> {
    let source = fs::read_to_string(path)?;
    generate_entity(&source).map_err(|e| with_path(e, path))
}

/// Read and convert a component schema file
pub fn generate_component_file(path: &Path) -> Result<GeneratedUnit> {
    let source = fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TypegenError::invalid(path.display().to_string(), "file name is not UTF-8"))?;
    generate_component(&source, stem).map_err(|e| with_path(e, path))
}

fn with_path(error: TypegenError, path: &Path) -> TypegenError {
    match error {
        TypegenError::Json(e) => TypegenError::invalid(path.display().to_string(), e),
        TypegenError::MissingInfo(_) => TypegenError::MissingInfo(path.display().to_string()),
        other => other,
    }
}
