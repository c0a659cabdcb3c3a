//! Core DependencyGraph structure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use minipack_config::{ConfigDiscovery, ConfigError, MinipackConfig};

use crate::chain::DependencyCycle;
use crate::error::Result;
use crate::factory::GraphNodeFactory;
use crate::index::GraphNodeIndex;
use crate::manifest::AppManifest;
use crate::node::{NodeId, OutputLayout};
use crate::package::PackageRegistry;
use crate::resolver::PathResolver;
use crate::runtime::Runtime;
use crate::runtime::native::NativeRuntime;

/// Dependency graph of one mini-program, rooted at its `app` entry.
///
/// Owns every node (through its factory), the path index and the package
/// registry. Separate instances share nothing, so several graphs can be built
/// side by side.
///
/// # Example
///
/// ```no_run
/// use minipack_graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::open(".")?;
/// graph.build()?;
/// for (id, chunk) in graph.chunks() {
///     println!("{id} -> {}", chunk.group);
/// }
/// # Ok::<(), minipack_graph::GraphError>(())
/// ```
#[derive(Debug)]
pub struct DependencyGraph {
    pub(super) runtime: Arc<dyn Runtime>,
    pub(super) config: MinipackConfig,
    pub(super) resolver: PathResolver,
    pub(super) layout: OutputLayout,
    pub(super) factory: GraphNodeFactory,
    pub(super) index: GraphNodeIndex,
    pub(super) registry: PackageRegistry,
    pub(super) manifest: AppManifest,
    pub(super) root: Option<NodeId>,
    /// Entry nodes currently being expanded, outermost first
    pub(super) visit_stack: Vec<NodeId>,
    pub(super) cycles: Vec<DependencyCycle>,
}

impl DependencyGraph {
    /// Create an empty graph over `app_root`. Nothing is read until
    /// [`DependencyGraph::build`].
    pub fn new(
        runtime: Arc<dyn Runtime>,
        app_root: impl Into<PathBuf>,
        config: MinipackConfig,
    ) -> Result<Self> {
        config.validate()?;
        let app_root = app_root.into();

        let factory = GraphNodeFactory::with_patterns(&config.ignore)?;
        let resolver = PathResolver::from_config(Arc::clone(&runtime), &app_root, &config);
        let layout = OutputLayout::from_config(&app_root, &config);

        Ok(Self {
            runtime,
            config,
            resolver,
            layout,
            factory,
            index: GraphNodeIndex::new(),
            registry: PackageRegistry::new(),
            manifest: AppManifest::default(),
            root: None,
            visit_stack: Vec::new(),
            cycles: Vec::new(),
        })
    }

    /// Graph over `<project_dir>/<source_root>` on the local filesystem.
    pub fn from_project(project_dir: impl AsRef<Path>, config: MinipackConfig) -> Result<Self> {
        let runtime: Arc<dyn Runtime> = Arc::new(NativeRuntime);
        let app_root = config.app_root(project_dir.as_ref());

        if !runtime.metadata(&app_root).is_ok_and(|m| m.is_dir) {
            return Err(ConfigError::SourceRootNotFound(app_root).into());
        }

        Self::new(runtime, app_root, config)
    }

    /// Discover the project's configuration, then [`DependencyGraph::from_project`].
    pub fn open(project_dir: impl AsRef<Path>) -> Result<Self> {
        let project_dir = project_dir.as_ref();
        let config = ConfigDiscovery::new(project_dir).load()?;
        Self::from_project(project_dir, config)
    }

    pub fn app_root(&self) -> &Path {
        self.resolver.app_root()
    }

    pub fn config(&self) -> &MinipackConfig {
        &self.config
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Drop every node, package and diagnostic from a previous build.
    pub(super) fn reset(&mut self) {
        self.factory.clear();
        self.index.clear();
        self.registry.clear();
        self.manifest = AppManifest::default();
        self.root = None;
        self.visit_stack.clear();
        self.cycles.clear();
        self.resolver.clear_cache();
    }
}
