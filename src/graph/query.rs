//! Bounded breadth-first traversal over a code graph.

use std::collections::{HashMap, HashSet, VecDeque};

use super::model::{CodeGraph, EdgeKind};

/// Which way edges are followed during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow outgoing edges.
    Forward,
    /// Follow incoming edges.
    Reverse,
}

/// Read-only traversal and filtering over a [`CodeGraph`].
pub struct GraphQuery<'g> {
    graph: &'g CodeGraph,
}

impl<'g> GraphQuery<'g> {
    pub fn new(graph: &'g CodeGraph) -> Self {
        Self { graph }
    }

    /// BFS from `start_id`, following edges of the given kinds (empty filter
    /// = all kinds), bounded by `max_depth` (`< 0` = unlimited).
    ///
    /// Each node is visited once, at its shortest-hop depth; a node first
    /// reached at `max_depth` is not expanded further. The result is the
    /// subgraph of all visited nodes, so it can contain edges that were
    /// never walked (e.g. a back-edge between two visited siblings). A
    /// nonexistent start id yields an empty graph.
    pub fn traverse(
        &self,
        start_id: &str,
        max_depth: i32,
        edge_kinds: &[EdgeKind],
        direction: Direction,
    ) -> CodeGraph {
        let mut visited: HashSet<String> = HashSet::new();
        let mut depth: HashMap<String, i32> = HashMap::new();
        let mut queue: VecDeque<String> = VecDeque::new();

        visited.insert(start_id.to_string());
        depth.insert(start_id.to_string(), 0);
        queue.push_back(start_id.to_string());

        while let Some(current) = queue.pop_front() {
            let current_depth = depth[&current];
            if max_depth >= 0 && current_depth >= max_depth {
                continue;
            }

            let edges: Vec<(&str, EdgeKind)> = match direction {
                Direction::Forward => self
                    .graph
                    .outgoing_edges(&current)
                    .map(|e| (e.target_id.as_str(), e.kind))
                    .collect(),
                Direction::Reverse => self
                    .graph
                    .incoming_edges(&current)
                    .map(|e| (e.source_id.as_str(), e.kind))
                    .collect(),
            };

            for (neighbor, kind) in edges {
                if !edge_kinds.is_empty() && !edge_kinds.contains(&kind) {
                    continue;
                }
                if !visited.contains(neighbor) {
                    visited.insert(neighbor.to_string());
                    depth.insert(neighbor.to_string(), current_depth + 1);
                    queue.push_back(neighbor.to_string());
                }
            }
        }

        self.graph.subgraph(&visited)
    }

    /// Forward traversal: follow outgoing edges from the start node.
    pub fn forward(&self, start_id: &str, max_depth: i32, edge_kinds: &[EdgeKind]) -> CodeGraph {
        self.traverse(start_id, max_depth, edge_kinds, Direction::Forward)
    }

    /// Reverse traversal: follow incoming edges to the start node.
    pub fn reverse(&self, start_id: &str, max_depth: i32, edge_kinds: &[EdgeKind]) -> CodeGraph {
        self.traverse(start_id, max_depth, edge_kinds, Direction::Reverse)
    }

    /// Keep only nodes whose qualified name starts with the package prefix.
    pub fn filter_by_package(&self, package_prefix: &str) -> CodeGraph {
        let ids: HashSet<String> = self
            .graph
            .nodes()
            .iter()
            .filter(|n| n.qualified_name.starts_with(package_prefix))
            .map(|n| n.id.clone())
            .collect();
        self.graph.subgraph(&ids)
    }

    /// Drop nodes whose qualified name starts with the package prefix.
    pub fn exclude_package(&self, package_prefix: &str) -> CodeGraph {
        let ids: HashSet<String> = self
            .graph
            .nodes()
            .iter()
            .filter(|n| !n.qualified_name.starts_with(package_prefix))
            .map(|n| n.id.clone())
            .collect();
        self.graph.subgraph(&ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{GraphEdge, GraphNode, NodeKind};

    /// A -> B -> C -> D chain of CALLS, plus one EXTENDS edge B -> D.
    fn chain() -> CodeGraph {
        let nodes = ["A", "B", "C", "D"]
            .iter()
            .map(|n| GraphNode::new(format!("type:{n}"), *n, *n, NodeKind::Class))
            .collect();
        let edges = vec![
            GraphEdge::new("type:A", "type:B", EdgeKind::Calls),
            GraphEdge::new("type:B", "type:C", EdgeKind::Calls),
            GraphEdge::new("type:C", "type:D", EdgeKind::Calls),
            GraphEdge::new("type:B", "type:D", EdgeKind::Extends),
        ];
        CodeGraph::new(nodes, edges)
    }

    #[test]
    fn depth_bounds_expansion() {
        let g = chain();
        let q = GraphQuery::new(&g);

        let d1 = q.forward("type:A", 1, &[EdgeKind::Calls]);
        assert_eq!(d1.node_count(), 2);

        let d2 = q.forward("type:A", 2, &[EdgeKind::Calls]);
        assert_eq!(d2.node_count(), 3);

        let unlimited = q.forward("type:A", -1, &[EdgeKind::Calls]);
        assert_eq!(unlimited.node_count(), 4);
    }

    #[test]
    fn depth_monotonicity() {
        let g = chain();
        let q = GraphQuery::new(&g);
        let ids = |g: &CodeGraph| -> std::collections::HashSet<String> {
            g.nodes().iter().map(|n| n.id.clone()).collect()
        };

        let unbounded = ids(&q.forward("type:A", -1, &[]));
        let mut previous = std::collections::HashSet::new();
        for depth in 0..5 {
            let current = ids(&q.forward("type:A", depth, &[]));
            assert!(previous.is_subset(&current));
            assert!(current.is_subset(&unbounded));
            previous = current;
        }
    }

    #[test]
    fn edge_kind_filter_restricts_traversal() {
        let g = chain();
        let q = GraphQuery::new(&g);

        let extends_only = q.forward("type:B", -1, &[EdgeKind::Extends]);
        let ids: Vec<_> = extends_only.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["type:B", "type:D"]);

        // Empty filter follows everything.
        let all = q.forward("type:B", -1, &[]);
        assert_eq!(all.node_count(), 3);
    }

    #[test]
    fn reverse_traversal_follows_incoming() {
        let g = chain();
        let q = GraphQuery::new(&g);

        let callers = q.reverse("type:D", -1, &[EdgeKind::Calls]);
        let ids: std::collections::HashSet<_> =
            callers.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            ["type:A", "type:B", "type:C", "type:D"].into_iter().collect()
        );
    }

    #[test]
    fn result_includes_untraversed_edges_between_visited_nodes() {
        // B and D are both visited via CALLS; the EXTENDS back-edge between
        // them lands in the subgraph even though it was filtered out.
        let g = chain();
        let q = GraphQuery::new(&g);
        let result = q.forward("type:A", -1, &[EdgeKind::Calls]);
        assert!(result
            .edges()
            .iter()
            .any(|e| e.kind == EdgeKind::Extends));
    }

    #[test]
    fn missing_start_yields_empty_graph() {
        let g = chain();
        let q = GraphQuery::new(&g);
        let result = q.forward("type:nope", -1, &[]);
        assert_eq!(result.node_count(), 0);
        assert_eq!(result.edge_count(), 0);
    }

    #[test]
    fn package_filters() {
        let nodes = vec![
            GraphNode::new("type:com.a.X", "X", "com.a.X", NodeKind::Class),
            GraphNode::new("type:com.b.Y", "Y", "com.b.Y", NodeKind::Class),
        ];
        let g = CodeGraph::new(nodes, Vec::new());
        let q = GraphQuery::new(&g);

        assert_eq!(q.filter_by_package("com.a").node_count(), 1);
        assert_eq!(q.exclude_package("com.a").node_count(), 1);
        assert_eq!(q.exclude_package("com").node_count(), 0);
    }
}
