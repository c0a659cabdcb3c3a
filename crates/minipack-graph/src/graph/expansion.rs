//! Recursive expansion of entry nodes.

use std::path::{Path, PathBuf};

use super::dependency_graph::DependencyGraph;
use crate::chain::DependencyCycle;
use crate::error::Result;
use crate::factory::NodeRequest;
use crate::manifest::{ComponentDescriptor, descriptor_path};
use crate::node::{NodeId, NodeKind, VisitState};

/// Options for [`DependencyGraph::add_node`].
#[derive(Debug, Clone)]
pub(crate) struct AddNode<'a> {
    pub parent: Option<NodeId>,
    pub reference: &'a str,
    pub context: &'a Path,
    pub kind: NodeKind,
    pub package_names: Vec<String>,
    /// Compute outputs right away instead of waiting for the final pass
    pub init: bool,
}

impl DependencyGraph {
    /// Create or reuse a node, expand it and index it.
    ///
    /// Returns `Ok(None)` for ignored references.
    pub(crate) fn add_node(&mut self, options: AddNode<'_>) -> Result<Option<NodeId>> {
        let request = NodeRequest {
            package_names: options.package_names,
            context: options.context,
            reference: options.reference,
            kind: options.kind,
        };

        let Some(id) =
            self.factory
                .create_graph_node(options.parent, request, &self.resolver, &mut self.registry)?
        else {
            return Ok(None);
        };

        self.build_node(id)?;

        if options.init {
            self.factory.node_mut(id).init(&self.registry, &self.layout);
        }
        self.index.add(&self.factory, id);

        Ok(Some(id))
    }

    /// Expand one node. Re-entering a node that is still being expanded
    /// records a cycle and returns; a built node is left alone.
    pub(crate) fn build_node(&mut self, id: NodeId) -> Result<()> {
        match self.factory.node(id).state() {
            VisitState::Built => return Ok(()),
            VisitState::Visiting => {
                self.record_cycle(id);
                return Ok(());
            }
            VisitState::Unvisited => {}
        }

        if !self.factory.node(id).is_entry() {
            self.factory.node_mut(id).state = VisitState::Built;
            return Ok(());
        }

        self.factory.node_mut(id).state = VisitState::Visiting;
        self.visit_stack.push(id);
        let result = self.expand(id);
        self.visit_stack.pop();

        self.factory.node_mut(id).state = match result {
            Ok(()) => VisitState::Built,
            Err(_) => VisitState::Unvisited,
        };
        result
    }

    fn expand(&mut self, id: NodeId) -> Result<()> {
        let path = self.factory.node(id).path().to_path_buf();
        let dir = self.factory.node(id).dir().to_path_buf();

        // The app's descriptor is the manifest parsed at the start of the build
        let using_components = if self.factory.node(id).kind() == NodeKind::App {
            self.manifest.using_components.clone()
        } else {
            ComponentDescriptor::load(self.runtime.as_ref(), &descriptor_path(&path))?.using_components
        };
        for reference in using_components.values() {
            self.add_node(AddNode {
                parent: Some(id),
                reference,
                context: &dir,
                kind: NodeKind::Component,
                package_names: self.package_snapshot(id),
                init: false,
            })?;
        }

        for companion in self.companions(&path)? {
            self.add_node(AddNode {
                parent: Some(id),
                reference: &companion,
                context: &dir,
                kind: NodeKind::EntryAsset,
                package_names: self.package_snapshot(id),
                init: false,
            })?;
        }

        tracing::debug!(
            node = %path.display(),
            dependencies = self.factory.node(id).outgoing().count(),
            "Expanded node"
        );
        Ok(())
    }

    /// Package names as they stand now; a cycle may add more while the node
    /// is still expanding.
    fn package_snapshot(&self, id: NodeId) -> Vec<String> {
        self.factory.node(id).package_names().iter().cloned().collect()
    }

    /// Same-basename siblings with a companion extension, as `./name`
    /// references, in file-name order.
    fn companions(&self, entry: &Path) -> Result<Vec<String>> {
        let Some(dir) = entry.parent() else {
            return Ok(Vec::new());
        };
        let basename = entry.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let own_name = entry.file_name().and_then(|s| s.to_str()).unwrap_or_default();

        let mut names = self.runtime.read_dir(dir)?;
        names.sort();

        let companions = names
            .into_iter()
            .filter(|name| name != own_name)
            .filter(|name| {
                let candidate = Path::new(name);
                let same_stem = candidate.file_stem().and_then(|s| s.to_str()) == Some(basename);
                let companion_ext = candidate
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| ext != "json" && self.is_companion_extension(ext));
                same_stem && companion_ext
            })
            .filter(|name| {
                self.runtime
                    .metadata(&dir.join(name))
                    .is_ok_and(|m| m.is_file)
            })
            .map(|name| format!("./{name}"))
            .collect();

        Ok(companions)
    }

    fn is_companion_extension(&self, ext: &str) -> bool {
        self.config
            .companion_extensions
            .iter()
            .any(|candidate| candidate.trim_start_matches('.') == ext)
    }

    fn record_cycle(&mut self, id: NodeId) {
        let start = self
            .visit_stack
            .iter()
            .position(|&visiting| visiting == id)
            .unwrap_or(self.visit_stack.len());

        let mut path: Vec<PathBuf> = self.visit_stack[start..]
            .iter()
            .map(|&node| self.factory.node(node).path().to_path_buf())
            .collect();
        path.push(self.factory.node(id).path().to_path_buf());
        if path.len() == 1 {
            path.insert(0, self.factory.node(id).path().to_path_buf());
        }

        let cycle = DependencyCycle::new(path);
        if self.cycles.contains(&cycle) {
            return;
        }
        tracing::warn!(cycle = %cycle, "Dependency cycle detected, expansion stops at the repeated node");
        self.cycles.push(cycle);
    }
}
