//! Platform runtime abstraction for the graph engine
//!
//! This module defines the `Runtime` trait that abstracts the filesystem
//! reads the graph performs. Embedding build tools implement this trait to
//! serve files from memory, a virtual filesystem, or the real disk.

pub mod native;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Other runtime error
    #[error("Runtime error: {0}")]
    Other(String),
}

/// File metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    /// Whether this is a directory
    pub is_dir: bool,
    /// Whether this is a file
    pub is_file: bool,
    /// Last modified timestamp (milliseconds since epoch)
    pub modified: Option<u64>,
}

/// Platform runtime trait
///
/// Graph construction is synchronous, so the blocking methods are the
/// required ones. The `*_async` variants back the asynchronous resolver API
/// and default to the blocking implementation.
///
/// # Example
///
/// ```rust,ignore
/// use minipack_graph::runtime::{Runtime, RuntimeResult};
///
/// #[derive(Debug)]
/// struct MyRuntime;
///
/// #[async_trait::async_trait]
/// impl Runtime for MyRuntime {
///     fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
///         // Platform-specific implementation
///     }
///
///     // ... implement other methods
/// }
/// ```
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file from the filesystem
    fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Get file metadata
    fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// List the entry names of a directory
    fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>>;

    /// Get the current working directory
    fn get_cwd(&self) -> RuntimeResult<PathBuf>;

    /// Read a file without blocking the caller's executor
    async fn read_file_async(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        self.read_file(path)
    }

    /// Get file metadata without blocking the caller's executor
    async fn metadata_async(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        self.metadata(path)
    }
}
