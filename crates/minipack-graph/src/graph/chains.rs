//! Dependency chain queries.

use std::collections::VecDeque;
use std::path::Path;

use rustc_hash::FxHashMap;

use super::dependency_graph::DependencyGraph;
use crate::chain::DependencyChain;
use crate::node::NodeId;

impl DependencyGraph {
    /// Shortest chain from the app root to the node at `target`.
    ///
    /// Useful for answering why a file ended up in a package. `None` when the
    /// node is unknown or unreachable from the root.
    pub fn dependency_chain_to(&self, target: &Path) -> Option<DependencyChain> {
        let root = self.root?;
        let target = self.index.get_node_by_request(target)?;

        let mut parents: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        let mut queue = VecDeque::from([root]);
        parents.insert(root, root);

        while let Some(id) = queue.pop_front() {
            if id == target {
                break;
            }
            for child in self.factory.node(id).outgoing() {
                if !parents.contains_key(&child) {
                    parents.insert(child, id);
                    queue.push_back(child);
                }
            }
        }

        if !parents.contains_key(&target) {
            return None;
        }

        let mut ids = vec![target];
        let mut current = target;
        while current != root {
            current = *parents.get(&current)?;
            ids.push(current);
        }
        ids.reverse();

        Some(DependencyChain::new(
            ids.into_iter()
                .map(|id| self.factory.node(id).path().to_path_buf())
                .collect(),
        ))
    }

    /// Number of edges between the app root and `target`.
    pub fn depth_of(&self, target: &Path) -> Option<usize> {
        self.dependency_chain_to(target).map(|chain| chain.depth)
    }
}
