//! Serializable snapshot of a built graph.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;

use super::dependency_graph::DependencyGraph;
use crate::chain::DependencyCycle;
use crate::error::Result;
use crate::node::{ChunkInfo, NodeKind};

/// Everything an embedding bundler needs, in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    pub app_root: PathBuf,
    pub packages: Vec<PackageSnapshot>,
    /// Sorted by path
    pub nodes: Vec<NodeSnapshot>,
    pub chunks: BTreeMap<String, ChunkInfo>,
    pub cycles: Vec<DependencyCycle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSnapshot {
    pub name: String,
    pub root: PathBuf,
    pub independent: bool,
    pub members: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub path: PathBuf,
    pub kind: NodeKind,
    pub packages: BTreeSet<String>,
    pub outputs: BTreeMap<String, PathBuf>,
    pub chunks: BTreeSet<ChunkInfo>,
    pub dependencies: Vec<PathBuf>,
}

impl DependencyGraph {
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<NodeSnapshot> = self
            .nodes()
            .map(|node| NodeSnapshot {
                path: node.path().to_path_buf(),
                kind: node.kind(),
                packages: node.package_names().clone(),
                outputs: node.output_map().clone(),
                chunks: node.chunk_infos().clone(),
                dependencies: node
                    .outgoing()
                    .map(|id| self.factory.node(id).path().to_path_buf())
                    .collect(),
            })
            .collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));

        let packages = self
            .registry
            .iter()
            .map(|info| {
                let mut members: Vec<PathBuf> = info
                    .members
                    .iter()
                    .map(|&id| self.factory.node(id).path().to_path_buf())
                    .collect();
                members.sort();
                PackageSnapshot {
                    name: info.name.clone(),
                    root: info.root.clone(),
                    independent: info.independent,
                    members,
                }
            })
            .collect();

        GraphSnapshot {
            app_root: self.app_root().to_path_buf(),
            packages,
            nodes,
            chunks: self.chunks().clone(),
            cycles: self.cycles.clone(),
        }
    }

    /// Pretty-printed JSON of [`DependencyGraph::snapshot`].
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}
