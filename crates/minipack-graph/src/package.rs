//! Declared packages: the main package and every sub-package.

use std::path::{Component, Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::node::NodeId;

/// One declared package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    /// Root directory relative to the app root; empty for the main package.
    pub root: PathBuf,
    pub independent: bool,
    #[serde(skip)]
    pub members: IndexSet<NodeId>,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, independent: bool) -> Self {
        Self {
            name: name.into(),
            root: normalize_root(root.into()),
            independent,
            members: IndexSet::new(),
        }
    }

    /// True iff `relative_path` (relative to the app root) lies under this
    /// package's root.
    pub fn contains(&self, relative_path: &Path) -> bool {
        is_under(&self.root, relative_path)
    }
}

/// Strip `./` and trailing separators so roots compare component-wise.
fn normalize_root(root: PathBuf) -> PathBuf {
    root.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn is_under(root: &Path, relative_path: &Path) -> bool {
    root.as_os_str().is_empty() || relative_path.starts_with(root)
}

/// Registry of declared packages, keyed by package name.
#[derive(Debug, Clone, Default)]
pub struct PackageRegistry {
    packages: IndexMap<String, PackageInfo>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, info: PackageInfo) {
        self.packages.insert(name.into(), info);
    }

    pub fn get(&self, name: &str) -> Option<&PackageInfo> {
        self.packages.get(name)
    }

    /// Record `node` as a member of `name`. Unknown packages are ignored.
    pub fn add_member(&mut self, name: &str, node: NodeId) {
        match self.packages.get_mut(name) {
            Some(info) => {
                info.members.insert(node);
            }
            None => warn_unknown(name),
        }
    }

    pub fn members(&self, name: &str) -> impl Iterator<Item = NodeId> + '_ {
        self.packages
            .get(name)
            .into_iter()
            .flat_map(|info| info.members.iter().copied())
    }

    pub fn is_independent(&self, name: &str) -> bool {
        match self.packages.get(name) {
            Some(info) => info.independent,
            None => {
                warn_unknown(name);
                false
            }
        }
    }

    /// Root directory of a package. An undeclared package degrades to a root
    /// equal to its name.
    pub fn root_of(&self, name: &str) -> PathBuf {
        match self.packages.get(name) {
            Some(info) => info.root.clone(),
            None => {
                warn_unknown(name);
                normalize_root(PathBuf::from(name))
            }
        }
    }

    pub fn is_located_in_package(&self, name: &str, relative_path: &Path) -> bool {
        match self.packages.get(name) {
            Some(info) => info.contains(relative_path),
            None => is_under(&self.root_of(name), relative_path),
        }
    }

    /// The sub-package whose root contains `relative_path`, or the package
    /// with an empty root (the main package) when none does.
    pub fn package_of_path(&self, relative_path: &Path) -> Option<&PackageInfo> {
        self.packages
            .values()
            .filter(|info| !info.root.as_os_str().is_empty() && info.contains(relative_path))
            .max_by_key(|info| info.root.components().count())
            .or_else(|| {
                self.packages
                    .values()
                    .find(|info| info.root.as_os_str().is_empty())
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageInfo> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn clear(&mut self) {
        self.packages.clear();
    }
}

fn warn_unknown(name: &str) {
    tracing::warn!(package = name, "Unknown package, treating its root as its name");
}
