//! Code graph module — the structural backbone of codemap.
//!
//! Provides the immutable graph model, the builder that resolves parsed
//! declarations into nodes and edges, and BFS traversal over the result.

pub mod builder;
pub mod model;
pub mod query;

pub use builder::build_graph;
pub use model::{CodeGraph, EdgeKind, GraphEdge, GraphNode, NodeKind};
pub use query::{Direction, GraphQuery};
