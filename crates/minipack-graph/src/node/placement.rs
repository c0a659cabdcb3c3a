//! Output-path and chunk placement policy.
//!
//! For every package P that references a node:
//! - if P is independent, or the node is used by exactly one non-independent
//!   sub-package and not by the main package, the node must live inside P.
//!   A node already under P's root keeps its path; any other node is copied to
//!   `<P.root>/<reference_dir>/<path relative to app root>`. The chunk group is
//!   P's root.
//! - otherwise the node keeps its natural path in the main chunk group.
//!
//! Independent packages never count towards the reference tally.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use minipack_config::MinipackConfig;
use serde::{Deserialize, Serialize};

use crate::package::PackageRegistry;

/// One named output unit for a (node, package) placement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkInfo {
    /// Output path relative to the app root, extension stripped, `/`-separated
    pub id: String,
    /// Main group, or the root of the package the copy belongs to
    pub group: String,
    pub independent: bool,
    pub package_name: String,
}

/// Where a node goes for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub package_name: String,
    pub output_path: PathBuf,
    pub chunk: ChunkInfo,
}

/// Fixed inputs of the placement policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub app_root: PathBuf,
    pub reference_dir: PathBuf,
    pub main_package: String,
}

impl OutputLayout {
    pub fn new(
        app_root: impl Into<PathBuf>,
        reference_dir: impl Into<PathBuf>,
        main_package: impl Into<String>,
    ) -> Self {
        Self {
            app_root: app_root.into(),
            reference_dir: reference_dir.into(),
            main_package: main_package.into(),
        }
    }

    pub fn from_config(app_root: impl Into<PathBuf>, config: &MinipackConfig) -> Self {
        Self::new(app_root, &config.reference_dir, &config.main_package)
    }

    /// Path relative to the app root. Paths outside the root keep their
    /// normal components so they still land somewhere under it.
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.app_root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => path
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect(),
        }
    }
}

/// Chunk id for a path relative to the app root.
pub fn chunk_id(relative: &Path) -> String {
    relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn group_name(root: &Path) -> String {
    root.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Apply the placement policy to one node.
///
/// Packages are visited in sorted order, so the result is independent of the
/// order in which the graph discovered them.
pub fn place_node(
    path: &Path,
    package_names: &BTreeSet<String>,
    registry: &PackageRegistry,
    layout: &OutputLayout,
) -> Vec<Placement> {
    let relative = layout.relative_path(path);
    let reference_count = package_names
        .iter()
        .filter(|name| !registry.is_independent(name))
        .count();
    let only_used_in_one_sub_package =
        !package_names.contains(&layout.main_package) && reference_count <= 1;

    package_names
        .iter()
        .map(|package_name| {
            let independent = registry.is_independent(package_name);

            if independent || only_used_in_one_sub_package {
                let root = registry.root_of(package_name);
                let relative_output = if registry.is_located_in_package(package_name, &relative) {
                    relative.clone()
                } else {
                    root.join(&layout.reference_dir).join(&relative)
                };

                Placement {
                    package_name: package_name.clone(),
                    output_path: layout.app_root.join(&relative_output),
                    chunk: ChunkInfo {
                        id: chunk_id(&relative_output),
                        group: group_name(&root),
                        independent,
                        package_name: package_name.clone(),
                    },
                }
            } else {
                Placement {
                    package_name: package_name.clone(),
                    output_path: path.to_path_buf(),
                    chunk: ChunkInfo {
                        id: chunk_id(&relative),
                        group: layout.main_package.clone(),
                        independent,
                        package_name: package_name.clone(),
                    },
                }
            }
        })
        .collect()
}
