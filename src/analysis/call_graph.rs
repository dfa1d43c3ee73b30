//! Method call-graph expansion, forward and reverse.

use crate::graph::{CodeGraph, EdgeKind, GraphQuery, NodeKind};

pub struct CallGraphAnalyzer<'g> {
    graph: &'g CodeGraph,
}

impl<'g> CallGraphAnalyzer<'g> {
    pub fn new(graph: &'g CodeGraph) -> Self {
        Self { graph }
    }

    /// Call graph from the given method, limited by depth (`-1` unlimited).
    pub fn call_graph(&self, method: &str, depth: i32) -> CodeGraph {
        let Some(node_id) = self.resolve_method_id(method) else {
            return CodeGraph::empty();
        };
        GraphQuery::new(self.graph).forward(&node_id, depth, &[EdgeKind::Calls])
    }

    /// All methods that transitively call the given method.
    pub fn incoming_calls(&self, method: &str) -> CodeGraph {
        let Some(node_id) = self.resolve_method_id(method) else {
            return CodeGraph::empty();
        };
        GraphQuery::new(self.graph).reverse(&node_id, -1, &[EdgeKind::Calls])
    }

    /// Exact `method:<input>` id match, then a substring scan over method
    /// and constructor nodes in insertion order; first match wins.
    fn resolve_method_id(&self, method: &str) -> Option<String> {
        let direct = format!("method:{method}");
        if self.graph.contains_node(&direct) {
            return Some(direct);
        }

        self.graph
            .nodes_by_kind(NodeKind::Method)
            .find(|n| n.qualified_name.contains(method))
            .or_else(|| {
                self.graph
                    .nodes_by_kind(NodeKind::Constructor)
                    .find(|n| n.qualified_name.contains(method))
            })
            .map(|n| n.id.clone())
    }
}
