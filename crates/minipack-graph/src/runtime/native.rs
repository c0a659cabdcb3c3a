//! Native Runtime Implementation
//!
//! Wraps `std::fs` for the blocking methods and `tokio::fs` for the async
//! ones, so the rest of the crate never touches the filesystem directly.

// NativeRuntime is platform-specific and wraps std::fs by design
#![allow(clippy::disallowed_methods)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Native filesystem Runtime implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    /// Create a new NativeRuntime instance.
    pub fn new() -> Self {
        Self
    }
}

fn map_io_error(path: &Path, action: &str, e: std::io::Error) -> RuntimeError {
    if e.kind() == std::io::ErrorKind::NotFound {
        RuntimeError::FileNotFound(path.to_path_buf())
    } else {
        RuntimeError::Io(format!("Failed to {} {}: {}", action, path.display(), e))
    }
}

fn to_metadata(metadata: std::fs::Metadata) -> FileMetadata {
    let modified = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64);

    FileMetadata {
        size: metadata.len(),
        is_dir: metadata.is_dir(),
        is_file: metadata.is_file(),
        modified,
    }
}

#[async_trait]
impl Runtime for NativeRuntime {
    fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, "read", e))
    }

    fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        std::fs::metadata(path)
            .map(to_metadata)
            .map_err(|e| map_io_error(path, "get metadata for", e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        let entries = std::fs::read_dir(path).map_err(|e| map_io_error(path, "read directory", e))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| RuntimeError::Io(format!("Failed to read directory entry: {}", e)))?;

            if let Some(name) = entry.file_name().to_str() {
                result.push(name.to_string());
            }
        }

        Ok(result)
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        std::env::current_dir().map_err(|e| {
            RuntimeError::Io(format!("Failed to get current working directory: {}", e))
        })
    }

    async fn read_file_async(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| map_io_error(path, "read", e))
    }

    async fn metadata_async(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        tokio::fs::metadata(path)
            .await
            .map(to_metadata)
            .map_err(|e| map_io_error(path, "get metadata for", e))
    }
}
