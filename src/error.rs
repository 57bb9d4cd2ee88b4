//! Error types for type generation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for typegen operations
pub type Result<T> = std::result::Result<T, TypegenError>;

/// Typegen errors
#[derive(Error, Debug)]
pub enum TypegenError {
    #[error("Schema has no info.singularName: {0}")]
    MissingInfo(String),

    #[error("Invalid schema {path}: {reason}")]
    InvalidSchema { path: String, reason: String },

    #[error("Output collision: {output:?} already produced by {first:?}")]
    OutputCollision { output: PathBuf, first: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl TypegenError {
    /// Wrap a parse failure with the path it came from
    pub fn invalid(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidSchema {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
