//! Full graph construction from the app manifest.

use std::path::Path;
use std::time::Instant;

use super::dependency_graph::DependencyGraph;
use super::expansion::AddNode;
use crate::error::{GraphError, Result};
use crate::manifest::AppManifest;
use crate::node::{NodeId, NodeKind};
use crate::package::PackageInfo;

/// Manifest file at the app root.
pub const APP_MANIFEST: &str = "app.json";

/// Entry reference of the app itself.
const APP_ENTRY: &str = "/app";

/// Turn a manifest path (`pages/index/index`) into a root-absolute reference.
fn root_reference(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

impl DependencyGraph {
    /// Build the whole graph from `app.json`.
    ///
    /// Every call starts over: previous nodes, packages and cycles are
    /// discarded. Output paths are computed in one pass once every package's
    /// entries have been expanded, so each node sees its final package set.
    pub fn build(&mut self) -> Result<()> {
        let start = Instant::now();
        self.reset();

        let manifest_path = self.app_root().join(APP_MANIFEST);
        self.manifest = AppManifest::load(self.runtime.as_ref(), &manifest_path)?;
        self.register_packages()?;

        let root = self.add_root()?;
        self.add_main_pages(root)?;
        if self.manifest.has_custom_tab_bar() {
            self.add_custom_tab_bar(root)?;
        }
        self.add_tab_bar_icons(root)?;
        self.add_sub_packages(root)?;

        self.index.add(&self.factory, root);
        self.index
            .init_graph_nodes(&mut self.factory, &self.registry, &self.layout);

        tracing::info!(
            nodes = self.index.len(),
            packages = self.registry.len(),
            chunks = self.index.chunks(&self.factory).len(),
            cycles = self.cycles.len(),
            "Built dependency graph in {:.2}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(())
    }

    fn main_package(&self) -> String {
        self.config.main_package.clone()
    }

    /// Declare every package before any node is created, so membership
    /// bookkeeping never sees an unknown name.
    ///
    /// A sub-package may not take the main package's name.
    fn register_packages(&mut self) -> Result<()> {
        let main = self.main_package();
        self.registry.set(&main, PackageInfo::new(&main, "", false));

        for decl in &self.manifest.sub_packages {
            let name = decl.package_name();
            if name == main {
                return Err(GraphError::Manifest {
                    path: self.app_root().join(APP_MANIFEST),
                    reason: format!(
                        "sub-package '{}' uses the main package name '{main}'",
                        decl.root
                    ),
                });
            }
            if self.registry.get(name).is_some() {
                tracing::warn!(package = name, root = %decl.root, "Duplicate package name, later declaration wins");
            }
            self.registry
                .set(name, PackageInfo::new(name, &decl.root, decl.independent));
        }
        Ok(())
    }

    fn add_root(&mut self) -> Result<NodeId> {
        let main = self.main_package();
        let app_root = self.app_root().to_path_buf();
        let path = self.resolver.resolve_dependency(&app_root, APP_ENTRY)?;

        let root = self
            .factory
            .create_root(path, NodeKind::App, &main, &mut self.registry);
        self.root = Some(root);
        self.build_node(root)?;
        Ok(root)
    }

    fn add_main_pages(&mut self, root: NodeId) -> Result<()> {
        let main = self.main_package();
        let app_root = self.app_root().to_path_buf();
        let pages = self.manifest.pages.clone();

        for page in &pages {
            self.add_node(AddNode {
                parent: Some(root),
                reference: &root_reference(page),
                context: &app_root,
                kind: NodeKind::Page,
                package_names: vec![main.clone()],
                init: false,
            })?;
        }
        Ok(())
    }

    fn add_custom_tab_bar(&mut self, root: NodeId) -> Result<()> {
        let main = self.main_package();
        let app_root = self.app_root().to_path_buf();
        let dir_reference = root_reference(&self.config.custom_tab_bar_dir);

        let dir = self.resolver.resolve_dir(&app_root, &dir_reference)?;
        tracing::debug!(dir = %dir.display(), "Expanding custom tab bar");

        self.add_node(AddNode {
            parent: Some(root),
            reference: &format!("{dir_reference}/index"),
            context: &app_root,
            kind: NodeKind::Component,
            package_names: vec![main],
            init: false,
        })?;
        Ok(())
    }

    fn add_tab_bar_icons(&mut self, root: NodeId) -> Result<()> {
        let main = self.main_package();
        let app_root = self.app_root().to_path_buf();
        let icons: Vec<String> = self
            .manifest
            .tab_bar_icons()
            .map(root_reference)
            .collect();

        for icon in &icons {
            self.add_node(AddNode {
                parent: Some(root),
                reference: icon,
                context: &app_root,
                kind: NodeKind::NormalAsset,
                package_names: vec![main.clone()],
                init: false,
            })?;
        }
        Ok(())
    }

    /// Sub-package pages are relative to their package root.
    fn add_sub_packages(&mut self, root: NodeId) -> Result<()> {
        let app_root = self.app_root().to_path_buf();
        let sub_packages = self.manifest.sub_packages.clone();

        for decl in &sub_packages {
            let name = decl.package_name().to_string();
            let package_root = Path::new(decl.root.trim_matches('/'));
            tracing::debug!(package = %name, root = %package_root.display(), pages = decl.pages.len(), "Expanding sub-package");

            for page in &decl.pages {
                let reference = root_reference(&package_root.join(page.trim_start_matches('/')).to_string_lossy());
                self.add_node(AddNode {
                    parent: Some(root),
                    reference: &reference,
                    context: &app_root,
                    kind: NodeKind::Page,
                    package_names: vec![name.clone()],
                    init: false,
                })?;
            }
        }
        Ok(())
    }
}
