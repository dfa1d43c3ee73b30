//! Structural analyses over the code graph.
//!
//! Each analyzer is a thin policy layer: resolve a human-given name to a
//! node id, then delegate to the traversal engine (or, for cycles, run
//! Tarjan SCC). A name that cannot be resolved yields an empty graph, never
//! an error.

pub mod call_graph;
pub mod cycles;
pub mod dependency;
pub mod impact;

pub use call_graph::CallGraphAnalyzer;
pub use cycles::CircularDependencyDetector;
pub use dependency::DependencyAnalyzer;
pub use impact::ImpactAnalyzer;
