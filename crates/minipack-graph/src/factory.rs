//! Node creation, caching and package-membership propagation.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{GraphError, Result};
use crate::node::{GraphNode, NodeId, NodeKind};
use crate::package::PackageRegistry;
use crate::resolver::PathResolver;

/// Arguments for [`GraphNodeFactory::create_graph_node`].
#[derive(Debug, Clone)]
pub struct NodeRequest<'a> {
    pub package_names: Vec<String>,
    /// Directory the reference is relative to
    pub context: &'a Path,
    pub reference: &'a str,
    pub kind: NodeKind,
}

/// Owns every node of one graph and the path -> node cache.
///
/// A node is created once per resolved absolute path; later requests for the
/// same path return the cached node and merge their package names into it.
#[derive(Debug, Default)]
pub struct GraphNodeFactory {
    nodes: Vec<GraphNode>,
    cache: FxHashMap<PathBuf, NodeId>,
    ignore: Vec<Regex>,
}

impl GraphNodeFactory {
    pub fn new(ignore: Vec<Regex>) -> Self {
        Self {
            nodes: Vec::new(),
            cache: FxHashMap::default(),
            ignore,
        }
    }

    /// Build from textual patterns.
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ignore = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|e| GraphError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(ignore))
    }

    pub fn is_ignored(&self, reference: &str) -> bool {
        self.ignore.iter().any(|pattern| pattern.is_match(reference))
    }

    /// Create or reuse the node a reference resolves to and link it to `parent`.
    ///
    /// Returns `Ok(None)` for ignored references. On a cache hit the request's
    /// package names are propagated through the existing node's subtree.
    pub fn create_graph_node(
        &mut self,
        parent: Option<NodeId>,
        request: NodeRequest<'_>,
        resolver: &PathResolver,
        registry: &mut PackageRegistry,
    ) -> Result<Option<NodeId>> {
        if self.is_ignored(request.reference) {
            tracing::debug!(reference = request.reference, "Ignoring reference");
            return Ok(None);
        }

        let path = resolver.resolve_dependency(request.context, request.reference)?;

        let id = match self.cache.get(&path) {
            Some(&id) => {
                self.propagate(id, &request.package_names, registry);
                id
            }
            None => {
                let id = self.insert(path, request.kind);
                for name in &request.package_names {
                    self.nodes[id.index()].add_package(name);
                    registry.add_member(name, id);
                }
                id
            }
        };

        if let Some(parent) = parent {
            self.link(parent, id);
        }

        Ok(Some(id))
    }

    /// Create a node for an already-resolved path without linking it.
    pub fn create_root(
        &mut self,
        path: PathBuf,
        kind: NodeKind,
        package_name: &str,
        registry: &mut PackageRegistry,
    ) -> NodeId {
        let id = match self.cache.get(&path) {
            Some(&id) => id,
            None => self.insert(path, kind),
        };
        self.propagate(id, &[package_name.to_string()], registry);
        id
    }

    fn insert(&mut self, path: PathBuf, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        tracing::debug!(node = %path.display(), ?kind, "Created node {}", id);
        self.cache.insert(path.clone(), id);
        self.nodes.push(GraphNode::new(id, path, kind));
        id
    }

    /// Record the edge in both directions. Set semantics dedupe repeats.
    /// Ids from another factory are ignored.
    pub fn link(&mut self, parent: NodeId, child: NodeId) {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        self.nodes[parent.index()].outgoing.insert(child);
        self.nodes[child.index()].incoming.insert(parent);
    }

    /// Remove every outgoing edge of `id` (and the matching back-references).
    pub fn unlink_children(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let children = std::mem::take(&mut node.outgoing);
        for child in children {
            if let Some(child) = self.get_mut(child) {
                child.incoming.shift_remove(&id);
            }
        }
    }

    /// Add `package_names` to `start` and everything reachable from it.
    ///
    /// Worklist over `outgoing`; a (node, package) pair is processed at most
    /// once, and a node that already carries a package stops the walk for that
    /// package, so cycles terminate.
    pub fn propagate(
        &mut self,
        start: NodeId,
        package_names: &[String],
        registry: &mut PackageRegistry,
    ) {
        let mut queue: VecDeque<(NodeId, &str)> = package_names
            .iter()
            .map(|name| (start, name.as_str()))
            .collect();
        let mut seen: FxHashSet<(NodeId, &str)> = FxHashSet::default();

        while let Some((id, name)) = queue.pop_front() {
            if !seen.insert((id, name)) {
                continue;
            }
            let Some(node) = self.nodes.get_mut(id.index()) else {
                continue;
            };
            if !node.add_package(name) {
                continue;
            }
            tracing::debug!(node = %node.path().display(), package = name, "Propagated package");
            registry.add_member(name, id);
            queue.extend(node.outgoing.iter().map(|&child| (child, name)));
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id.index())
    }

    /// Panics if `id` came from another factory; public callers use [`GraphNodeFactory::get`].
    pub(crate) fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut GraphNode {
        &mut self.nodes[id.index()]
    }

    pub fn lookup(&self, path: &Path) -> Option<NodeId> {
        self.cache.get(path).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node. Ids handed out earlier become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use crate::package::PackageInfo;
    use crate::runtime::native::NativeRuntime;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        root: PathBuf,
        resolver: PathResolver,
        registry: PackageRegistry,
    }

    fn fixture(files: &[&str]) -> Fixture {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }
        let resolver = PathResolver::new(Arc::new(NativeRuntime), &root)
            .with_extensions(vec!["js".to_string()]);
        let mut registry = PackageRegistry::new();
        for name in ["app", "pkgA", "pkgB"] {
            registry.set(name, PackageInfo::new(name, if name == "app" { "" } else { name }, false));
        }
        Fixture {
            _temp: temp,
            root,
            resolver,
            registry,
        }
    }

    fn request<'a>(context: &'a Path, reference: &'a str, packages: &[&str]) -> NodeRequest<'a> {
        NodeRequest {
            package_names: packages.iter().map(|p| p.to_string()).collect(),
            context,
            reference,
            kind: NodeKind::Component,
        }
    }

    #[test]
    fn test_same_path_yields_same_node() {
        let mut fx = fixture(&["components/a.js"]);
        let mut factory = GraphNodeFactory::default();
        let root = fx.root.clone();

        let first = factory
            .create_graph_node(None, request(&root, "/components/a", &["app"]), &fx.resolver, &mut fx.registry)
            .unwrap()
            .unwrap();
        let second = factory
            .create_graph_node(None, request(&root.join("components"), "./a", &["app"]), &fx.resolver, &mut fx.registry)
            .unwrap()
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(factory.len(), 1);
        assert_eq!(fx.registry.members("app").count(), 1);
    }

    #[test]
    fn test_repeated_edges_are_deduplicated() {
        let mut fx = fixture(&["pages/p.js", "components/a.js"]);
        let mut factory = GraphNodeFactory::default();
        let root = fx.root.clone();

        let page = factory.create_root(root.join("pages/p.js"), NodeKind::Page, "app", &mut fx.registry);
        for _ in 0..2 {
            factory
                .create_graph_node(Some(page), request(&root, "/components/a", &["app"]), &fx.resolver, &mut fx.registry)
                .unwrap();
        }

        let child = factory.lookup(&root.join("components/a.js")).unwrap();
        assert_eq!(factory.node(page).outgoing().collect::<Vec<_>>(), vec![child]);
        assert_eq!(factory.node(child).incoming().collect::<Vec<_>>(), vec![page]);
    }

    #[test]
    fn test_ignored_reference_is_skipped() {
        let mut fx = fixture(&[]);
        let mut factory = GraphNodeFactory::with_patterns(["^plugin://"]).unwrap();
        let root = fx.root.clone();

        let result = factory
            .create_graph_node(None, request(&root, "plugin://chart/chart", &["app"]), &fx.resolver, &mut fx.registry)
            .unwrap();
        assert!(result.is_none());
        assert!(factory.is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(matches!(
            GraphNodeFactory::with_patterns(["(oops"]),
            Err(GraphError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_cache_hit_propagates_through_cycle() {
        let mut fx = fixture(&["components/a.js", "components/b.js"]);
        let mut factory = GraphNodeFactory::default();
        let root = fx.root.clone();

        let a = factory.create_root(root.join("components/a.js"), NodeKind::Component, "pkgA", &mut fx.registry);
        let b = factory
            .create_graph_node(Some(a), request(&root, "/components/b", &["pkgA"]), &fx.resolver, &mut fx.registry)
            .unwrap()
            .unwrap();
        factory.link(b, a);

        // A second package reaches `a`; the whole cycle must pick it up
        factory
            .create_graph_node(None, request(&root, "/components/a", &["pkgB"]), &fx.resolver, &mut fx.registry)
            .unwrap();

        for id in [a, b] {
            let names: Vec<_> = factory.node(id).package_names().iter().cloned().collect();
            assert_eq!(names, vec!["pkgA".to_string(), "pkgB".to_string()]);
        }
        assert_eq!(fx.registry.members("pkgB").count(), 2);
    }

    #[test]
    fn test_unlink_children_clears_back_references() {
        let mut fx = fixture(&["components/a.js", "components/b.js"]);
        let mut factory = GraphNodeFactory::default();
        let root = fx.root.clone();

        let a = factory.create_root(root.join("components/a.js"), NodeKind::Component, "app", &mut fx.registry);
        let b = factory
            .create_graph_node(Some(a), request(&root, "/components/b", &["app"]), &fx.resolver, &mut fx.registry)
            .unwrap()
            .unwrap();

        factory.unlink_children(a);
        assert_eq!(factory.node(a).outgoing().count(), 0);
        assert_eq!(factory.node(b).incoming().count(), 0);
    }

    #[test]
    fn test_foreign_ids_are_ignored() {
        let mut fx = fixture(&[]);
        let root = fx.root.clone();
        let mut other = GraphNodeFactory::default();
        other.create_root(root.join("a.js"), NodeKind::Component, "app", &mut fx.registry);
        let foreign = other.create_root(root.join("b.js"), NodeKind::Component, "app", &mut fx.registry);

        let mut factory = GraphNodeFactory::default();
        let a = factory.create_root(root.join("a.js"), NodeKind::Component, "app", &mut fx.registry);

        factory.link(a, foreign);
        factory.unlink_children(foreign);
        factory.propagate(foreign, &["pkgA".to_string()], &mut fx.registry);

        assert!(factory.get(foreign).is_none());
        assert_eq!(factory.node(a).outgoing().count(), 0);
        assert!(!factory.node(a).has_package("pkgA"));
    }
}
