use std::path::PathBuf;

use minipack_config::ConfigError;

use crate::runtime::RuntimeError;

/// Error types for graph construction.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A referenced file cannot be found.
    #[error("Cannot resolve '{reference}' from '{}'", context.display())]
    Resolution { reference: String, context: PathBuf },

    /// A referenced directory cannot be found.
    #[error("Cannot resolve directory '{reference}' from '{}'", context.display())]
    DirectoryNotFound { reference: String, context: PathBuf },

    /// The app manifest or a page/component descriptor is missing or malformed.
    #[error("Invalid descriptor '{}': {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    /// A path handed to the graph is not one of its nodes.
    #[error("No graph node for '{}'", .0.display())]
    UnknownNode(PathBuf),

    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to serialize graph: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
