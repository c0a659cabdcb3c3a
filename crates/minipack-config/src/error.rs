//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found")]
    NotFound,

    #[error("source root not found: {0}")]
    SourceRootNotFound(PathBuf),

    #[error("invalid config value for `{field}`: {}", .hint.as_deref().unwrap_or("no details"))]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid ignore pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
