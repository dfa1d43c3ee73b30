//! The analysis facade: parse once, query many times.
//!
//! [`CodeMapEngine`] owns the parsed declarations, the built graph, and the
//! fingerprint cache. Every query method returns an [`AnalysisResult`]
//! envelope carrying the result subgraph plus run metadata, ready for JSON
//! emission. Querying before [`CodeMapEngine::analyze`] is an error, not a
//! silent empty result.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analysis::{
    CallGraphAnalyzer, CircularDependencyDetector, DependencyAnalyzer, ImpactAnalyzer,
};
use crate::cache::{CacheStats, FingerprintCache};
use crate::error::{CodemapError, Result};
use crate::graph::{build_graph, CodeGraph, GraphQuery};
use crate::model::ClassInfo;
use crate::parser;

/// Headline numbers for one analyzed project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_classes_parsed: usize,
    pub total_methods_parsed: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
}

/// Envelope around a query result: which query ran, against what, when, and
/// the subgraph it produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub command: String,
    pub target: String,
    pub timestamp: DateTime<Utc>,
    pub analysis_time_ms: u64,
    pub stats: AnalysisStats,
    pub graph: CodeGraph,
    /// Cycle groups, present only for circular-dependency results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycles: Option<Vec<Vec<String>>>,
}

impl AnalysisResult {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Default)]
pub struct CodeMapEngine {
    cache: FingerprintCache,
    classes: Vec<ClassInfo>,
    graph: Option<CodeGraph>,
}

impl CodeMapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every source file under `root` and build the code graph.
    /// Re-analyzing the same engine reuses the fingerprint cache, so only
    /// changed files are re-parsed.
    pub fn analyze(&mut self, root: &Path) -> Result<()> {
        fs::metadata(root)?;
        let started = Instant::now();

        self.classes = parser::parse_project(root, &self.cache);
        let graph = build_graph(&self.classes);
        info!(
            classes = self.classes.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );

        self.graph = Some(graph);
        Ok(())
    }

    /// The built graph, or [`CodemapError::NotAnalyzed`] before `analyze`.
    pub fn graph(&self) -> Result<&CodeGraph> {
        self.graph.as_ref().ok_or(CodemapError::NotAnalyzed)
    }

    /// Outgoing call graph of a method, bounded by `depth` (`-1` unlimited).
    pub fn call_graph(&self, method: &str, depth: i32) -> Result<AnalysisResult> {
        let started = Instant::now();
        let graph = CallGraphAnalyzer::new(self.graph()?).call_graph(method, depth);
        Ok(self.envelope("callgraph", method, graph, None, started))
    }

    /// Every method that transitively calls the given method.
    pub fn incoming_calls(&self, method: &str) -> Result<AnalysisResult> {
        let started = Instant::now();
        let graph = CallGraphAnalyzer::new(self.graph()?).incoming_calls(method);
        Ok(self.envelope("incoming-calls", method, graph, None, started))
    }

    /// Direct dependencies of a class.
    pub fn class_dependencies(&self, class_name: &str) -> Result<AnalysisResult> {
        let started = Instant::now();
        let graph = DependencyAnalyzer::new(self.graph()?).class_dependencies(class_name);
        Ok(self.envelope("dependencies", class_name, graph, None, started))
    }

    /// Everything that transitively depends on a class.
    pub fn dependents(&self, class_name: &str) -> Result<AnalysisResult> {
        let started = Instant::now();
        let graph = DependencyAnalyzer::new(self.graph()?).dependents(class_name);
        Ok(self.envelope("dependents", class_name, graph, None, started))
    }

    /// Dependency cycles between types. The result graph is the subgraph of
    /// every node that participates in some cycle.
    pub fn circular_dependencies(&self) -> Result<AnalysisResult> {
        let started = Instant::now();
        let full = self.graph()?;
        let cycles = CircularDependencyDetector::new(full).detect();
        let ids: HashSet<String> = cycles.iter().flatten().cloned().collect();
        let graph = full.subgraph(&ids);
        Ok(self.envelope("circular-dependencies", "all", graph, Some(cycles), started))
    }

    /// Everything transitively affected by changing a class.
    pub fn impact(&self, class_name: &str) -> Result<AnalysisResult> {
        let started = Instant::now();
        let graph = ImpactAnalyzer::new(self.graph()?).impact(class_name);
        Ok(self.envelope("impact", class_name, graph, None, started))
    }

    /// Number of distinct direct dependents of a class.
    pub fn direct_impact_count(&self, class_name: &str) -> Result<usize> {
        Ok(ImpactAnalyzer::new(self.graph()?).direct_impact_count(class_name))
    }

    /// The whole graph, optionally narrowed to (or purged of) one package
    /// prefix. The include filter applies before the exclude filter.
    pub fn full_graph(
        &self,
        package: Option<&str>,
        exclude_package: Option<&str>,
    ) -> Result<AnalysisResult> {
        let started = Instant::now();
        let mut graph = self.graph()?.clone();
        if let Some(prefix) = package {
            graph = GraphQuery::new(&graph).filter_by_package(prefix);
        }
        if let Some(prefix) = exclude_package {
            graph = GraphQuery::new(&graph).exclude_package(prefix);
        }
        Ok(self.envelope("fullgraph", "all", graph, None, started))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn envelope(
        &self,
        command: &str,
        target: &str,
        graph: CodeGraph,
        cycles: Option<Vec<Vec<String>>>,
        started: Instant,
    ) -> AnalysisResult {
        AnalysisResult {
            command: command.to_string(),
            target: target.to_string(),
            timestamp: Utc::now(),
            analysis_time_ms: started.elapsed().as_millis() as u64,
            stats: AnalysisStats {
                total_classes_parsed: self.classes.len(),
                total_methods_parsed: self.classes.iter().map(|c| c.methods.len()).sum(),
                graph_nodes: graph.node_count(),
                graph_edges: graph.edge_count(),
            },
            graph,
            cycles,
        }
    }
}
