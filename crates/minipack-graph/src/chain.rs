//! Dependency chains and cycles between graph nodes.
//!
//! Both are plain lists of node paths so they stay meaningful after the graph
//! that produced them is rebuilt.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One path through the graph, from an entry towards a target node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChain {
    pub path: Vec<PathBuf>,
    /// Path length - 1
    pub depth: usize,
}

impl DependencyChain {
    pub fn new(path: Vec<PathBuf>) -> Self {
        let depth = path.len().saturating_sub(1);
        Self { path, depth }
    }

    pub fn entry_point(&self) -> Option<&Path> {
        self.path.first().map(PathBuf::as_path)
    }

    pub fn target(&self) -> Option<&Path> {
        self.path.last().map(PathBuf::as_path)
    }

    /// Example: "app.js -> pages/index/index.js -> components/btn/btn.js"
    pub fn format_chain(&self) -> String {
        format_paths(&self.path)
    }
}

/// A node whose expansion re-entered itself.
///
/// `path` starts and ends with the re-entered node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyCycle {
    pub path: Vec<PathBuf>,
}

impl DependencyCycle {
    pub fn new(path: Vec<PathBuf>) -> Self {
        Self { path }
    }

    /// Number of distinct nodes on the cycle.
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, node: &Path) -> bool {
        self.path.iter().any(|p| p == node)
    }

    /// True for a node listing itself as a used component.
    pub fn is_self_reference(&self) -> bool {
        self.len() == 1
    }
}

impl fmt::Display for DependencyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_paths(&self.path))
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
