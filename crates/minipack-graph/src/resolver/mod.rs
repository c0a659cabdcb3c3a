//! Reference resolution against the app root.
//!
//! A reference is one of:
//! - root-absolute (`/components/btn/btn`), resolved against the app root,
//! - relative (`./btn`), resolved against the context directory,
//! - aliased (`@components/btn/btn`), rewritten to root-absolute first,
//! - bare (`btn`), looked up in package directories, then retried as `./btn`.

mod aliases;
mod candidates;

pub use aliases::resolve_path_alias;
pub use candidates::{ReferenceKind, base_candidates, file_candidates};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use minipack_config::MinipackConfig;
use parking_lot::Mutex;
use path_clean::PathClean;
use rustc_hash::FxHashMap;

use crate::error::{GraphError, Result};
use crate::runtime::{FileMetadata, Runtime};

/// Resolves references to absolute paths.
///
/// Stat results are cached per resolver, so one resolver should not outlive a
/// build whose files may change underneath it (see [`PathResolver::clear_cache`]).
#[derive(Debug)]
pub struct PathResolver {
    runtime: Arc<dyn Runtime>,
    app_root: PathBuf,
    path_aliases: IndexMap<String, String>,
    extensions: Vec<String>,
    module_dirs: Vec<String>,
    stat_cache: Mutex<FxHashMap<PathBuf, Option<FileMetadata>>>,
}

impl PathResolver {
    /// Create a resolver with no aliases, no extensions and no package dirs.
    pub fn new(runtime: Arc<dyn Runtime>, app_root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            app_root: app_root.into(),
            path_aliases: IndexMap::new(),
            extensions: Vec::new(),
            module_dirs: Vec::new(),
            stat_cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// Create a resolver using the config's aliases, extensions and package dirs.
    pub fn from_config(
        runtime: Arc<dyn Runtime>,
        app_root: impl Into<PathBuf>,
        config: &MinipackConfig,
    ) -> Self {
        Self::new(runtime, app_root)
            .with_aliases(config.path_aliases.clone())
            .with_extensions(config.entry_extensions.clone())
            .with_module_dirs(config.module_dirs.clone())
    }

    pub fn with_aliases(mut self, aliases: IndexMap<String, String>) -> Self {
        self.path_aliases = aliases;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_module_dirs(mut self, module_dirs: Vec<String>) -> Self {
        self.module_dirs = module_dirs;
        self
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    /// Drop cached stat results.
    pub fn clear_cache(&self) {
        self.stat_cache.lock().clear();
    }

    /// Resolve a reference to an existing file.
    pub fn resolve_dependency(&self, context: &Path, reference: &str) -> Result<PathBuf> {
        for base in self.bases(context, reference) {
            for candidate in file_candidates(&base, &self.extensions) {
                if self.stat(&candidate).is_some_and(|m| m.is_file) {
                    return Ok(candidate);
                }
            }
        }

        Err(GraphError::Resolution {
            reference: reference.to_string(),
            context: context.to_path_buf(),
        })
    }

    /// Resolve an already-absolute filesystem path to an existing file,
    /// trying the configured extensions. References always go through
    /// [`PathResolver::resolve_dependency`]; this is for embedders holding paths.
    pub fn resolve_path(&self, path: &Path) -> Result<PathBuf> {
        for candidate in file_candidates(&path.to_path_buf().clean(), &self.extensions) {
            if self.stat(&candidate).is_some_and(|m| m.is_file) {
                return Ok(candidate);
            }
        }

        Err(GraphError::Resolution {
            reference: path.display().to_string(),
            context: path.parent().unwrap_or(path).to_path_buf(),
        })
    }

    /// Resolve a reference to an existing directory.
    pub fn resolve_dir(&self, context: &Path, reference: &str) -> Result<PathBuf> {
        for base in self.bases(context, reference) {
            if self.stat(&base).is_some_and(|m| m.is_dir) {
                return Ok(base);
            }
        }

        Err(GraphError::DirectoryNotFound {
            reference: reference.to_string(),
            context: context.to_path_buf(),
        })
    }

    /// Async variant of [`PathResolver::resolve_dependency`].
    pub async fn resolve_dependency_async(
        &self,
        context: &Path,
        reference: &str,
    ) -> Result<PathBuf> {
        for base in self.bases(context, reference) {
            for candidate in file_candidates(&base, &self.extensions) {
                if self.stat_async(&candidate).await.is_some_and(|m| m.is_file) {
                    return Ok(candidate);
                }
            }
        }

        Err(GraphError::Resolution {
            reference: reference.to_string(),
            context: context.to_path_buf(),
        })
    }

    /// Async variant of [`PathResolver::resolve_dir`].
    pub async fn resolve_dir_async(&self, context: &Path, reference: &str) -> Result<PathBuf> {
        for base in self.bases(context, reference) {
            if self.stat_async(&base).await.is_some_and(|m| m.is_dir) {
                return Ok(base);
            }
        }

        Err(GraphError::DirectoryNotFound {
            reference: reference.to_string(),
            context: context.to_path_buf(),
        })
    }

    fn bases(&self, context: &Path, reference: &str) -> Vec<PathBuf> {
        let aliased = resolve_path_alias(reference, &self.path_aliases);
        let reference = aliased.as_deref().unwrap_or(reference);
        base_candidates(&self.app_root, context, reference, &self.module_dirs)
    }

    fn stat(&self, path: &Path) -> Option<FileMetadata> {
        if let Some(cached) = self.stat_cache.lock().get(path) {
            return *cached;
        }
        let metadata = self.runtime.metadata(path).ok();
        self.stat_cache.lock().insert(path.to_path_buf(), metadata);
        metadata
    }

    async fn stat_async(&self, path: &Path) -> Option<FileMetadata> {
        let cached = self.stat_cache.lock().get(path).copied();
        if let Some(cached) = cached {
            return cached;
        }
        let metadata = self.runtime.metadata_async(path).await.ok();
        self.stat_cache.lock().insert(path.to_path_buf(), metadata);
        metadata
    }
}
