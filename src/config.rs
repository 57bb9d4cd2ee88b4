//! Configuration management for type generation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file in the project root (typegen.toml, .typegen.toml)
//! - User config directory (schema-typegen/typegen.toml)
//! - Legacy include list (types/Config.json)
//! - Explicit `--config` file
//! - Environment variables (TYPEGEN__*)
//!
//! ## Example config file (typegen.toml):
//! ```toml
//! include = ["extensions/blog/content-types/post/schema.json"]
//!
//! [paths]
//! api_dir = "src/api"
//! components_dir = "src/components"
//! output_dir = "types"
//!
//! [output]
//! write_boilerplate = true
//! skip_unchanged = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Project-relative location of the legacy include list
pub const LEGACY_CONFIG: &str = "types/Config.json";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypegenConfig {
    /// Extra entity schema files, relative to the project root
    #[serde(default)]
    pub include: Vec<PathBuf>,

    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Output behaviour
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input and output directories, relative to the project root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Holds `<name>/content-types/<name>/schema.json`
    #[serde(default = "default_api_dir")]
    pub api_dir: PathBuf,

    /// Holds `<category>/<component>.json`
    #[serde(default = "default_components_dir")]
    pub components_dir: PathBuf,

    /// Generated files go here
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write Payload/User/Media/MediaFormat
    #[serde(default = "default_true")]
    pub write_boilerplate: bool,

    /// Leave files whose content would not change
    #[serde(default = "default_true")]
    pub skip_unchanged: bool,
}

// Default value functions
fn default_api_dir() -> PathBuf {
    PathBuf::from("src/api")
}

fn default_components_dir() -> PathBuf {
    PathBuf::from("src/components")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("types")
}

fn default_true() -> bool {
    true
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            api_dir: default_api_dir(),
            components_dir: default_components_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_boilerplate: true,
            skip_unchanged: true,
        }
    }
}

impl TypegenConfig {
    /// Load configuration for the project in the current directory
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from(Path::new("."), None)
    }

    /// Load configuration for a project root, optionally from a specific file
    pub fn load_from(root: &Path, config_path: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for location in ["typegen.toml", ".typegen.toml"] {
            builder = builder.add_source(File::from(root.join(location)).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schema-typegen") {
            let user_config = config_dir.config_dir().join("typegen.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        // `{ "include": [...] }` next to the generated files
        builder = builder.add_source(File::from(root.join(LEGACY_CONFIG)).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Load from environment variables (TYPEGEN__*)
        builder = builder.add_source(
            Environment::with_prefix("TYPEGEN")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("include"),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn api_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.api_dir)
    }

    pub fn components_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.components_dir)
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.paths.output_dir)
    }

    /// Include entries resolved against the project root
    pub fn include_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.include.iter().map(|p| root.join(p)).collect()
    }
}
