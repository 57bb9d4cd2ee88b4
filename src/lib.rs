//! Schema Typegen
//!
//! Generates TypeScript declarations from headless CMS content-type schemas.
//! Every schema yields two interfaces: a nested one matching the wrapped API
//! response (`{ data: ... }` envelopes, `attributes` block) and a flattened
//! `CM_` counterpart with the same properties unwrapped.
//!
//! ## Features
//!
//! - **Closed kind mapping**: every attribute kind maps to a fixed pair of types
//! - **Reference resolution**: relations, components and media become imports
//! - **Import deduplication**: one combined statement per module path
//! - **Soft failure**: unparsable schemas are skipped, the run continues
//! - **Drift checks**: compare generated output with what is on disk
//!
//! ## Layout
//!
//! ```text
//! types/
//! ├── Payload.ts
//! ├── User.ts
//! ├── Media.ts
//! ├── MediaFormat.ts
//! ├── Article.ts          (one per content type)
//! └── components/
//!     └── Seo.ts          (one per component)
//! ```

pub mod codegen;
pub mod config;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod schema;

pub use codegen::{generate_component, generate_entity, GeneratedUnit, Variant};
pub use config::TypegenConfig;
pub use discovery::{discover, Discovered, SchemaFile};
pub use error::{Result, TypegenError};
pub use generator::{DriftReport, Plan, Typegen, WriteReport};
pub use schema::{Attribute, AttributeKind, ContentSchema, RelationArity};
