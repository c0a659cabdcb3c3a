//! Read-only queries over a built graph.

use std::collections::BTreeMap;
use std::path::Path;

use super::dependency_graph::DependencyGraph;
use crate::chain::DependencyCycle;
use crate::factory::GraphNodeFactory;
use crate::index::GraphNodeIndex;
use crate::manifest::AppManifest;
use crate::node::{ChunkInfo, GraphNode, NodeId, NodeKind};
use crate::package::PackageRegistry;

impl DependencyGraph {
    /// The `app` node, once built.
    pub fn root(&self) -> Option<&GraphNode> {
        self.root.map(|id| self.factory.node(id))
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.factory.get(id)
    }

    /// Look up a node by absolute path.
    pub fn node_by_path(&self, path: &Path) -> Option<&GraphNode> {
        self.index
            .get_node_by_request(path)
            .map(|id| self.factory.node(id))
    }

    /// Look up a node by path relative to the app root.
    pub fn node_by_relative_path(&self, relative: impl AsRef<Path>) -> Option<&GraphNode> {
        self.node_by_path(&self.app_root().join(relative))
    }

    /// Indexed nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.index.ids().map(|id| self.factory.node(id))
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes().filter(move |node| node.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Chunk id -> chunk for every placement in the graph.
    pub fn chunks(&self) -> &BTreeMap<String, ChunkInfo> {
        self.index.chunks(&self.factory)
    }

    /// Cycles met during construction, in discovery order.
    pub fn cycles(&self) -> &[DependencyCycle] {
        &self.cycles
    }

    /// Nodes recorded as members of a package.
    pub fn package_members(&self, name: &str) -> impl Iterator<Item = &GraphNode> {
        self.registry.members(name).map(|id| self.factory.node(id))
    }

    /// Output path of the node at `path` for `package`.
    pub fn output_path(&self, path: &Path, package: &str) -> Option<&Path> {
        self.node_by_path(path)?.output_path(package)
    }

    /// Direct dependents of the node at `path`.
    pub fn dependents(&self, path: &Path) -> Vec<&GraphNode> {
        self.node_by_path(path)
            .map(|node| node.incoming().map(|id| self.factory.node(id)).collect())
            .unwrap_or_default()
    }

    /// Direct dependencies of the node at `path`.
    pub fn dependencies(&self, path: &Path) -> Vec<&GraphNode> {
        self.node_by_path(path)
            .map(|node| node.outgoing().map(|id| self.factory.node(id)).collect())
            .unwrap_or_default()
    }

    pub fn registry(&self) -> &PackageRegistry {
        &self.registry
    }

    pub fn index(&self) -> &GraphNodeIndex {
        &self.index
    }

    pub fn factory(&self) -> &GraphNodeFactory {
        &self.factory
    }

    pub fn manifest(&self) -> &AppManifest {
        &self.manifest
    }
}
