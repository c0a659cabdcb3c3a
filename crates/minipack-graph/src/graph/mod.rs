//! The root DependencyGraph.
//!
//! The struct lives in `dependency_graph`; the other modules add impl blocks
//! for construction, expansion, targeted mutations, queries and snapshots.

mod chains;
mod construction;
mod dependency_graph;
mod expansion;
mod mutations;
mod queries;
mod serialization;

pub use construction::APP_MANIFEST;
pub use dependency_graph::DependencyGraph;
pub use serialization::{GraphSnapshot, NodeSnapshot, PackageSnapshot};
