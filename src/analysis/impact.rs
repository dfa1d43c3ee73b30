//! Impact analysis: what breaks if a type changes.

use std::collections::HashSet;

use crate::graph::{CodeGraph, EdgeKind, GraphQuery};

use super::dependency::resolve_type_id;

pub struct ImpactAnalyzer<'g> {
    graph: &'g CodeGraph,
}

impl<'g> ImpactAnalyzer<'g> {
    pub fn new(graph: &'g CodeGraph) -> Self {
        Self { graph }
    }

    /// Everything transitively affected by modifying the given class:
    /// reverse traversal over dependency, inheritance, and call edges.
    pub fn impact(&self, class_name: &str) -> CodeGraph {
        let Some(class_id) = resolve_type_id(self.graph, class_name) else {
            return CodeGraph::empty();
        };
        GraphQuery::new(self.graph).reverse(
            &class_id,
            -1,
            &[
                EdgeKind::Dependency,
                EdgeKind::Extends,
                EdgeKind::Implements,
                EdgeKind::Calls,
            ],
        )
    }

    /// Number of distinct direct dependents: incoming DEPENDENCY, EXTENDS,
    /// and IMPLEMENTS edges only, no traversal.
    pub fn direct_impact_count(&self, class_name: &str) -> usize {
        let Some(class_id) = resolve_type_id(self.graph, class_name) else {
            return 0;
        };
        let sources: HashSet<&str> = self
            .graph
            .incoming_edges(&class_id)
            .filter(|e| {
                matches!(
                    e.kind,
                    EdgeKind::Dependency | EdgeKind::Extends | EdgeKind::Implements
                )
            })
            .map(|e| e.source_id.as_str())
            .collect();
        sources.len()
    }
}
