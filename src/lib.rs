//! # codemap
//!
//! Structural code-graph engine for Java codebases.
//!
//! codemap parses a project into declaration records, builds an immutable,
//! id-indexed graph of types and members, and answers structural questions
//! against it: call graphs, dependency and impact analysis, cycle
//! detection, and configurable architecture rules.
//!
//! ## Key properties
//!
//! - **Deterministic**: files are parsed in sorted order and names resolve
//!   through fixed fallback chains, so the same sources always produce the
//!   same graph and the same answers.
//! - **Heuristic resolution**: no classpath or type inference. Call and
//!   type references resolve by qualified-name lookup with documented
//!   fallbacks; unresolved references are dropped, never invented.
//! - **Incremental re-analysis**: parse results are cached per file and
//!   validated by content fingerprint, so re-analyzing a project re-parses
//!   only what changed.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use codemap::CodeMapEngine;
//!
//! # fn main() -> codemap::Result<()> {
//! let mut engine = CodeMapEngine::new();
//! engine.analyze(std::path::Path::new("./my-project"))?;
//!
//! let result = engine.call_graph("OrderService.process", 3)?;
//! println!("{}", result.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod model;
pub mod parser;
pub mod rules;

// Re-exports for convenience
pub use cache::{CacheStats, FingerprintCache};
pub use config::CodemapConfig;
pub use engine::{AnalysisResult, AnalysisStats, CodeMapEngine};
pub use error::{CodemapError, Result};
pub use graph::{build_graph, CodeGraph, Direction, EdgeKind, GraphQuery, NodeKind};
pub use model::{ClassInfo, MethodInfo};
pub use rules::{ArchitectureRule, RuleEngine, Severity, Violation};
