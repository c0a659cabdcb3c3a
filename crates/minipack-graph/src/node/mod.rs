//! Graph nodes: one resource (page, component or asset) each.
//!
//! Nodes live in the arena owned by [`GraphNodeFactory`](crate::GraphNodeFactory)
//! and refer to each other by [`NodeId`]. `outgoing` is the traversal
//! direction; `incoming` is a back-reference kept for queries only.

mod placement;

pub use placement::{ChunkInfo, OutputLayout, Placement, chunk_id, place_node};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::package::PackageRegistry;

/// Arena index of a node. Only meaningful for the graph that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    App,
    Page,
    Component,
    /// Same-basename companion of an entry (markup, styles, script)
    EntryAsset,
    /// Leaf asset added explicitly by a caller (icons, images)
    NormalAsset,
}

impl NodeKind {
    /// Entry kinds carry a sibling JSON descriptor and expand themselves.
    pub fn is_entry(self) -> bool {
        matches!(self, Self::App | Self::Page | Self::Component)
    }
}

/// Expansion state guarding [`DependencyGraph::build`](crate::DependencyGraph::build)
/// against re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitState {
    #[default]
    Unvisited,
    Visiting,
    Built,
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    id: NodeId,
    path: PathBuf,
    kind: NodeKind,
    package_names: BTreeSet<String>,
    pub(crate) state: VisitState,
    pub(crate) incoming: IndexSet<NodeId>,
    pub(crate) outgoing: IndexSet<NodeId>,
    output_map: BTreeMap<String, PathBuf>,
    chunk_infos: BTreeSet<ChunkInfo>,
}

impl GraphNode {
    pub(crate) fn new(id: NodeId, path: PathBuf, kind: NodeKind) -> Self {
        Self {
            id,
            path,
            kind,
            package_names: BTreeSet::new(),
            state: VisitState::Unvisited,
            incoming: IndexSet::new(),
            outgoing: IndexSet::new(),
            output_map: BTreeMap::new(),
            chunk_infos: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Absolute resource path; the node's identity within one graph.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_entry(&self) -> bool {
        self.kind.is_entry()
    }

    /// File name without extension.
    pub fn basename(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }

    pub fn package_names(&self) -> &BTreeSet<String> {
        &self.package_names
    }

    pub fn has_package(&self, name: &str) -> bool {
        self.package_names.contains(name)
    }

    pub fn state(&self) -> VisitState {
        self.state
    }

    pub fn incoming(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming.iter().copied()
    }

    pub fn outgoing(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing.iter().copied()
    }

    /// Package name -> absolute output path. Empty until [`GraphNode::init`] runs.
    pub fn output_map(&self) -> &BTreeMap<String, PathBuf> {
        &self.output_map
    }

    pub fn output_path(&self, package: &str) -> Option<&Path> {
        self.output_map.get(package).map(PathBuf::as_path)
    }

    pub fn chunk_infos(&self) -> &BTreeSet<ChunkInfo> {
        &self.chunk_infos
    }

    /// Add a package name; returns false when it was already present.
    pub(crate) fn add_package(&mut self, name: &str) -> bool {
        if self.package_names.contains(name) {
            return false;
        }
        self.package_names.insert(name.to_string());
        true
    }

    /// Compute `output_map` and `chunk_infos` from the current package set.
    ///
    /// Must run after every package's entries have been expanded; an earlier
    /// call sees an incomplete membership set.
    pub fn init(&mut self, registry: &PackageRegistry, layout: &OutputLayout) {
        self.output_map.clear();
        self.chunk_infos.clear();

        for placement in place_node(&self.path, &self.package_names, registry, layout) {
            tracing::debug!(
                node = %self.path.display(),
                package = %placement.package_name,
                output = %placement.output_path.display(),
                "placed node"
            );
            self.output_map
                .insert(placement.package_name.clone(), placement.output_path);
            self.chunk_infos.insert(placement.chunk);
        }
    }
}
