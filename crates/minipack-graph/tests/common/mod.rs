//! Shared fixtures: a mini-program written to a temp directory.

#![allow(clippy::disallowed_methods)]
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minipack_graph::{DependencyGraph, MinipackConfig, NativeRuntime};
use serde_json::{Value, json};
use tempfile::TempDir;

pub struct Project {
    _temp: TempDir,
    pub root: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("src");
        fs::create_dir_all(&root).unwrap();
        Self { _temp: temp, root }
    }

    /// Write a file relative to the app root.
    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    pub fn app(&self, manifest: Value) -> &Self {
        self.write("app.js", "App({})");
        self.write("app.json", &manifest.to_string())
    }

    /// An entry (page or component) with script, markup, styles and a descriptor.
    pub fn entry(&self, stem: &str, using: &[(&str, &str)]) -> &Self {
        let using: serde_json::Map<String, Value> = using
            .iter()
            .map(|(alias, reference)| (alias.to_string(), json!(reference)))
            .collect();
        self.write(&format!("{stem}.js"), "Component({})");
        self.write(&format!("{stem}.wxml"), "<view />");
        self.write(&format!("{stem}.wxss"), "");
        self.write(
            &format!("{stem}.json"),
            &json!({ "component": true, "usingComponents": using }).to_string(),
        )
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn graph(&self) -> DependencyGraph {
        self.graph_with(MinipackConfig::default())
    }

    pub fn graph_with(&self, config: MinipackConfig) -> DependencyGraph {
        DependencyGraph::new(Arc::new(NativeRuntime), &self.root, config).unwrap()
    }

    pub fn built(&self) -> DependencyGraph {
        let mut graph = self.graph();
        graph.build().unwrap();
        graph
    }
}

/// Package names of the node at `relative`, sorted.
pub fn packages_of(graph: &DependencyGraph, relative: &str) -> Vec<String> {
    graph
        .node_by_relative_path(relative)
        .unwrap_or_else(|| panic!("no node for {relative}"))
        .package_names()
        .iter()
        .cloned()
        .collect()
}

/// Output path of the node at `relative` for `package`, relative to the app root.
pub fn output_of(graph: &DependencyGraph, relative: &str, package: &str) -> PathBuf {
    let node = graph
        .node_by_relative_path(relative)
        .unwrap_or_else(|| panic!("no node for {relative}"));
    let output = node
        .output_path(package)
        .unwrap_or_else(|| panic!("{relative} has no output for {package}"));
    relative_to(graph.app_root(), output)
}

pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap().to_path_buf()
}
