//! Flat index over the nodes of one graph.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use once_cell::unsync::OnceCell;

use crate::factory::GraphNodeFactory;
use crate::node::{ChunkInfo, NodeId, OutputLayout};
use crate::package::PackageRegistry;

/// Path -> node lookup plus the derived chunk table.
///
/// The chunk table is computed on first read and dropped by every mutation,
/// so bulk insertion stays linear.
#[derive(Debug, Default, Clone)]
pub struct GraphNodeIndex {
    nodes: IndexMap<PathBuf, NodeId>,
    chunks: OnceCell<BTreeMap<String, ChunkInfo>>,
}

impl GraphNodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the node was already indexed or `id` is not one of
    /// `factory`'s nodes.
    pub fn add(&mut self, factory: &GraphNodeFactory, id: NodeId) -> bool {
        let Some(node) = factory.get(id) else {
            return false;
        };
        let path = node.path().to_path_buf();
        let inserted = self.nodes.insert(path, id).is_none();
        if inserted {
            self.invalidate_chunks();
        }
        inserted
    }

    pub fn add_all<I>(&mut self, factory: &GraphNodeFactory, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        for id in ids {
            self.add(factory, id);
        }
    }

    pub fn get_node_by_request(&self, path: &Path) -> Option<NodeId> {
        self.nodes.get(path).copied()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    /// Indexed nodes in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.values().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.invalidate_chunks();
    }

    /// Merge with other indexes over the same factory. Earlier entries win.
    pub fn concat<'a, I>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a GraphNodeIndex>,
    {
        let mut merged = Self {
            nodes: self.nodes.clone(),
            chunks: OnceCell::new(),
        };
        for other in others {
            for (path, &id) in &other.nodes {
                merged.nodes.entry(path.clone()).or_insert(id);
            }
        }
        merged
    }

    /// Run the deferred output-path computation on every indexed node.
    ///
    /// Call only once every package's entries have been expanded.
    pub fn init_graph_nodes(
        &mut self,
        factory: &mut GraphNodeFactory,
        registry: &PackageRegistry,
        layout: &OutputLayout,
    ) {
        for &id in self.nodes.values() {
            if let Some(node) = factory.get_mut(id) {
                node.init(registry, layout);
            }
        }
        self.invalidate_chunks();
    }

    /// Chunk id -> chunk, built from every indexed node's `chunk_infos`.
    ///
    /// When two placements share an id the first indexed node wins.
    pub fn chunks(&self, factory: &GraphNodeFactory) -> &BTreeMap<String, ChunkInfo> {
        self.chunks.get_or_init(|| {
            let mut chunks = BTreeMap::new();
            for node in self.nodes.values().filter_map(|&id| factory.get(id)) {
                for chunk in node.chunk_infos() {
                    chunks.entry(chunk.id.clone()).or_insert_with(|| chunk.clone());
                }
            }
            tracing::debug!(chunks = chunks.len(), "Computed chunk table");
            chunks
        })
    }

    pub fn invalidate_chunks(&mut self) {
        self.chunks.take();
    }

    pub fn is_chunk_table_cached(&self) -> bool {
        self.chunks.get().is_some()
    }
}
