//! # minipack-graph
//!
//! Dependency graph and sub-package placement for mini-program projects.
//!
//! Starting from `app.json`, the graph follows every page, component
//! (`usingComponents`), companion file (markup, styles, scripts sharing an
//! entry's basename) and tab-bar icon. Each node records which packages reach
//! it. Once construction is complete, every node gets one output path and one
//! chunk per package:
//!
//! - used by the main package, or shared by two or more regular sub-packages:
//!   the node stays where it is, in the main chunk group;
//! - used by exactly one regular sub-package: the node is copied into that
//!   package's reference folder (unless it already lives there);
//! - used by an independent sub-package: always copied into that package.
//!
//! ## Architecture
//!
//! ```text
//! DependencyGraph ── AppManifest (app.json)
//!   ├── GraphNodeFactory   arena of GraphNode + path cache + propagation
//!   ├── GraphNodeIndex     path lookup + lazy chunk table
//!   ├── PackageRegistry    main package and sub-packages
//!   └── PathResolver       references -> absolute paths (through a Runtime)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use minipack_graph::DependencyGraph;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = DependencyGraph::open("./my-app")?;
//! graph.build()?;
//!
//! let shared = graph.app_root().join("components/shared/shared.js");
//! if let Some(path) = graph.output_path(&shared, "pkgA") {
//!     println!("pkgA gets its copy at {}", path.display());
//! }
//! for cycle in graph.cycles() {
//!     eprintln!("cycle: {cycle}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod error;
pub mod factory;
pub mod graph;
pub mod index;
pub mod manifest;
pub mod node;
pub mod package;
pub mod resolver;
pub mod runtime;

#[cfg(feature = "logging")]
pub mod logging;

pub use chain::{DependencyChain, DependencyCycle};
pub use error::{GraphError, Result};
pub use factory::{GraphNodeFactory, NodeRequest};
pub use graph::{DependencyGraph, GraphSnapshot, NodeSnapshot, PackageSnapshot};
pub use index::GraphNodeIndex;
pub use manifest::{AppManifest, ComponentDescriptor, SubPackageDecl, TabBar, TabBarItem};
pub use node::{
    ChunkInfo, GraphNode, NodeId, NodeKind, OutputLayout, Placement, VisitState, chunk_id,
    place_node,
};
pub use package::{PackageInfo, PackageRegistry};
pub use resolver::PathResolver;
pub use runtime::native::NativeRuntime;
pub use runtime::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

pub use minipack_config::MinipackConfig;
