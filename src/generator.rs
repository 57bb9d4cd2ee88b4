//! Type Generation Runs
//!
//! Discovers schemas, converts each one in memory and then writes or
//! checks the results. A schema that fails to convert is recorded and
//! skipped; it never stops the run.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use tracing::{debug, info, warn};

use crate::codegen::{self, boilerplate, GeneratedUnit, Variant};
use crate::config::TypegenConfig;
use crate::discovery::{discover, SchemaFile};
use crate::error::{Result, TypegenError};

/// Subdirectory of the output dir for component files
pub const COMPONENTS_DIR: &str = "components";

// =============================================================================
// Plan
// =============================================================================

/// Where a planned file came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "schema", rename_all = "snake_case")]
pub enum FileSource {
    Boilerplate,
    Entity(PathBuf),
    Component(PathBuf),
}

impl FileSource {
    fn schema_path(&self) -> Option<&Path> {
        match self {
            FileSource::Boilerplate => None,
            FileSource::Entity(path) | FileSource::Component(path) => Some(path),
        }
    }
}

/// A file to write, relative to the output directory
#[derive(Debug, Clone, Serialize)]
pub struct PlannedFile {
    pub path: PathBuf,
    #[serde(skip)]
    pub contents: String,
    pub source: FileSource,
}

/// A schema that produced no output
#[derive(Debug, Clone, Serialize)]
pub struct SkippedSchema {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a run would write
#[derive(Debug, Clone, Default, Serialize)]
pub struct Plan {
    pub files: Vec<PlannedFile>,
    pub skipped: Vec<SkippedSchema>,
}

impl Plan {
    /// Add a file unless another schema already claims its path.
    ///
    /// A schema may replace a boilerplate file of the same name, which is how
    /// an included `user` schema extends the built-in `User` type.
    fn add(&mut self, file: PlannedFile) {
        if let Some(existing) = self
            .files
            .iter_mut()
            .find(|f| f.path == file.path && f.source == FileSource::Boilerplate)
        {
            if file.source != FileSource::Boilerplate {
                debug!(path = %file.path.display(), "schema replaces boilerplate");
                *existing = file;
                return;
            }
        }

        if let Some(first) = self.files.iter().find(|f| f.path == file.path) {
            let error = TypegenError::OutputCollision {
                output: file.path.clone(),
                first: first
                    .source
                    .schema_path()
                    .map_or_else(|| PathBuf::from("<boilerplate>"), Path::to_path_buf),
            };
            warn!(%error, "skipping schema");
            if let Some(path) = file.source.schema_path() {
                self.skipped.push(SkippedSchema {
                    path: path.to_path_buf(),
                    reason: error.to_string(),
                });
            }
            return;
        }
        self.files.push(file);
    }

    fn skip(&mut self, path: &Path, error: &TypegenError) {
        warn!(path = %path.display(), %error, "skipping schema");
        self.skipped.push(SkippedSchema {
            path: path.to_path_buf(),
            reason: error.to_string(),
        });
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&PlannedFile> {
        self.files.iter().find(|f| f.path == path.as_ref())
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Outcome of writing a plan
#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub unchanged: usize,
    pub skipped: Vec<SkippedSchema>,
}

/// One out-of-date file
#[derive(Debug, Clone, Serialize)]
pub struct FileDrift {
    pub path: PathBuf,
    pub added: usize,
    pub removed: usize,
    /// Unified diff from the file on disk to the generated text
    pub diff: String,
}

/// Difference between a plan and the files on disk
#[derive(Debug, Clone, Default, Serialize)]
pub struct DriftReport {
    pub missing: Vec<PathBuf>,
    pub changed: Vec<FileDrift>,
    pub up_to_date: usize,
    pub skipped: Vec<SkippedSchema>,
}

impl DriftReport {
    pub fn has_drift(&self) -> bool {
        !self.missing.is_empty() || !self.changed.is_empty()
    }
}

// =============================================================================
// Typegen
// =============================================================================

/// Type generation for one project root
pub struct Typegen {
    root: PathBuf,
    config: TypegenConfig,
}

impl Typegen {
    pub fn new(root: impl AsRef<Path>, config: TypegenConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &TypegenConfig {
        &self.config
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir(&self.root)
    }

    /// Convert every discovered schema in memory
    pub fn plan(&self) -> Plan {
        let discovered = discover(&self.root, &self.config);
        let mut plan = Plan::default();

        if self.config.output.write_boilerplate {
            for file in boilerplate::files() {
                plan.add(PlannedFile {
                    path: PathBuf::from(file.file_name),
                    contents: file.contents.to_string(),
                    source: FileSource::Boilerplate,
                });
            }
        }

        for schema in discovered.entities.iter().chain(&discovered.components) {
            match convert(schema) {
                Ok(unit) => {
                    debug!(
                        schema = %schema.path.display(),
                        interface = %unit.name,
                        imports = unit.imports.len(),
                        "converted schema"
                    );
                    plan.add(planned_file(schema, &unit));
                }
                Err(error) => plan.skip(&schema.path, &error),
            }
        }

        info!(
            files = plan.files.len(),
            skipped = plan.skipped.len(),
            "planned output"
        );
        plan
    }

    /// Write a plan into the output directory
    pub fn write(&self, plan: &Plan) -> Result<WriteReport> {
        let output_dir = self.output_dir();
        let mut report = WriteReport {
            skipped: plan.skipped.clone(),
            ..WriteReport::default()
        };

        for file in &plan.files {
            let target = output_dir.join(&file.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            if self.config.output.skip_unchanged
                && fs::read_to_string(&target).is_ok_and(|current| current == file.contents)
            {
                report.unchanged += 1;
                continue;
            }

            fs::write(&target, &file.contents)?;
            debug!(path = %target.display(), "wrote file");
            report.written.push(file.path.clone());
        }

        info!(
            written = report.written.len(),
            unchanged = report.unchanged,
            skipped = report.skipped.len(),
            output = %output_dir.display(),
            "generation complete"
        );
        Ok(report)
    }

    /// Plan and write in one step
    pub fn run(&self) -> Result<WriteReport> {
        let plan = self.plan();
        self.write(&plan)
    }

    /// Compare a plan against the output directory without writing
    pub fn check(&self, plan: &Plan) -> Result<DriftReport> {
        let output_dir = self.output_dir();
        let mut report = DriftReport {
            skipped: plan.skipped.clone(),
            ..DriftReport::default()
        };

        for file in &plan.files {
            let target = output_dir.join(&file.path);
            let current = match fs::read_to_string(&target) {
                Ok(current) => current,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    report.missing.push(file.path.clone());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if current == file.contents {
                report.up_to_date += 1;
            } else {
                report.changed.push(file_drift(&file.path, &current, &file.contents));
            }
        }

        Ok(report)
    }
}

fn convert(schema: &SchemaFile) -> Result<GeneratedUnit> {
    match schema.variant {
        Variant::Entity => codegen::generate_entity_file(&schema.path),
        Variant::Component => codegen::generate_component_file(&schema.path),
    }
}

fn planned_file(schema: &SchemaFile, unit: &GeneratedUnit) -> PlannedFile {
    let (path, source) = match schema.variant {
        Variant::Entity => (
            PathBuf::from(unit.file_name()),
            FileSource::Entity(schema.path.clone()),
        ),
        Variant::Component => (
            Path::new(COMPONENTS_DIR).join(unit.file_name()),
            FileSource::Component(schema.path.clone()),
        ),
    };
    PlannedFile {
        path,
        contents: unit.render(),
        source,
    }
}

fn file_drift(path: &Path, current: &str, generated: &str) -> FileDrift {
    let diff = TextDiff::from_lines(current, generated);

    let mut added = 0;
    let mut removed = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }

    let label = path.display().to_string();
    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string();

    FileDrift {
        path: path.to_path_buf(),
        added,
        removed,
        diff: unified,
    }
}

/// Output files grouped by source kind, for summaries
pub fn count_by_source(plan: &Plan) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for file in &plan.files {
        let key = match file.source {
            FileSource::Boilerplate => "boilerplate",
            FileSource::Entity(_) => "entity",
            FileSource::Component(_) => "component",
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_plan_without_boilerplate() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "src/api/tag/content-types/tag/schema.json",
            r#"{"info": {"singularName": "tag"}, "attributes": {"name": {"type": "string"}}}"#,
        );

        let mut config = TypegenConfig::default();
        config.output.write_boilerplate = false;
        let plan = Typegen::new(dir.path(), config).plan();

        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.files[0].path, PathBuf::from("Tag.ts"));
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_collision_keeps_first() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/components/a/seo.json", r#"{"attributes": {"title": {"type": "string"}}}"#);
        write(dir.path(), "src/components/b/seo.json", r#"{"attributes": {"other": {"type": "string"}}}"#);

        let plan = Typegen::new(dir.path(), TypegenConfig::default()).plan();

        let seo = plan.get("components/Seo.ts").unwrap();
        assert!(seo.contents.contains("title: string;"));
        assert_eq!(plan.skipped.len(), 1);
        assert!(plan.skipped[0].path.ends_with("b/seo.json"));
    }

    #[test]
    fn test_file_drift_counts() {
        let drift = file_drift(Path::new("Tag.ts"), "a\nb\n", "a\nc\nd\n");
        assert_eq!(drift.added, 2);
        assert_eq!(drift.removed, 1);
        assert!(drift.diff.contains("--- a/Tag.ts"));
        assert!(drift.diff.contains("+++ b/Tag.ts"));
    }

    #[test]
    fn test_count_by_source() {
        let dir = tempdir().unwrap();
        let plan = Typegen::new(dir.path(), TypegenConfig::default()).plan();
        let counts = count_by_source(&plan);
        assert_eq!(counts.get("boilerplate"), Some(&4));
        assert_eq!(counts.get("entity"), None);
    }

    #[test]
    fn test_count_by_source_sorted() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/api/tag/content-types/tag/schema.json", r#"{"info": {"singularName": "tag"}, "attributes": {}}"#);
        write(dir.path(), "src/components/shared/seo.json", r#"{"attributes": {}}"#);

        let plan = Typegen::new(dir.path(), TypegenConfig::default()).plan();
        let kinds: Vec<&str> = count_by_source(&plan).into_keys().collect();
        assert_eq!(kinds, vec!["boilerplate", "component", "entity"]);
    }

    #[test]
    fn test_included_schema_replaces_boilerplate() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "src/extensions/users-permissions/content-types/user/schema.json",
            r#"{"info": {"singularName": "user"}, "attributes": {
                "username": {"type": "string"},
                "nickname": {"type": "string", "required": false}
            }}"#,
        );

        let mut config = TypegenConfig::default();
        config.include.push(PathBuf::from(
            "src/extensions/users-permissions/content-types/user/schema.json",
        ));
        let plan = Typegen::new(dir.path(), config).plan();

        assert!(plan.skipped.is_empty());
        assert_eq!(plan.files.len(), 4);
        let user = plan.get("User.ts").unwrap();
        assert!(matches!(user.source, FileSource::Entity(_)));
        assert!(user.contents.contains("nickname?: string;"));
    }

    #[test]
    fn test_boilerplate_replacement_still_first_wins_between_schemas() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/api/media/content-types/media/schema.json", r#"{"info": {"singularName": "media"}, "attributes": {"first": {"type": "string"}}}"#);
        write(dir.path(), "extra/media.json", r#"{"info": {"singularName": "media"}, "attributes": {"second": {"type": "string"}}}"#);

        let mut config = TypegenConfig::default();
        config.include.push(PathBuf::from("extra/media.json"));
        let plan = Typegen::new(dir.path(), config).plan();

        let media = plan.get("Media.ts").unwrap();
        assert!(media.contents.contains("first: string;"));
        assert_eq!(plan.skipped.len(), 1);
        assert!(plan.skipped[0].path.ends_with("extra/media.json"));
    }
}
