//! Targeted updates after construction.

use std::collections::VecDeque;
use std::path::Path;

use rustc_hash::FxHashSet;

use super::dependency_graph::DependencyGraph;
use super::expansion::AddNode;
use crate::error::{GraphError, Result};
use crate::node::{NodeId, NodeKind, VisitState};

impl DependencyGraph {
    /// Re-expand one node after its descriptor changed.
    ///
    /// Shallow: the node's outgoing edges are dropped and rebuilt, but output
    /// paths and the chunk table are left as they were. Nodes that are no
    /// longer referenced stay in the graph, and package names are never
    /// removed. Use [`DependencyGraph::refresh_node`] when outputs must follow.
    pub fn rebuild_node(&mut self, path: &Path) -> Result<NodeId> {
        let id = self.require(path)?;

        tracing::debug!(node = %path.display(), "Rebuilding node");
        self.factory.unlink_children(id);
        self.factory.node_mut(id).state = VisitState::Unvisited;
        self.resolver.clear_cache();
        self.build_node(id)?;
        Ok(id)
    }

    /// [`DependencyGraph::rebuild_node`], then recompute outputs for the
    /// node's reachable closure and drop the cached chunk table.
    pub fn refresh_node(&mut self, path: &Path) -> Result<NodeId> {
        let id = self.rebuild_node(path)?;

        let closure = self.reachable_from(id);
        for &node in &closure {
            self.factory.node_mut(node).init(&self.registry, &self.layout);
        }
        self.index.invalidate_chunks();

        tracing::debug!(node = %path.display(), refreshed = closure.len(), "Refreshed node outputs");
        Ok(id)
    }

    /// Attach an asset discovered in `parent`'s source (an image, a script).
    ///
    /// The asset inherits the parent's packages and gets its outputs right
    /// away, since no later pass would compute them.
    pub fn add_asset(&mut self, parent_path: &Path, reference: &str) -> Result<Option<NodeId>> {
        let parent = self.require(parent_path)?;
        let context = self.factory.node(parent).dir().to_path_buf();
        let package_names = self.factory.node(parent).package_names().iter().cloned().collect();

        let id = self.add_node(AddNode {
            parent: Some(parent),
            reference,
            context: &context,
            kind: NodeKind::NormalAsset,
            package_names,
            init: true,
        })?;
        // A cache hit re-inits an already indexed node
        self.index.invalidate_chunks();
        Ok(id)
    }

    fn require(&self, path: &Path) -> Result<NodeId> {
        self.factory
            .lookup(path)
            .ok_or_else(|| GraphError::UnknownNode(path.to_path_buf()))
    }

    /// `start` plus everything reachable over outgoing edges, in BFS order.
    pub(crate) fn reachable_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([start]);

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            queue.extend(self.factory.node(id).outgoing());
        }
        order
    }
}
