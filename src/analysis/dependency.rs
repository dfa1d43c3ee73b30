//! Class-level dependency analysis: what a type uses, and what uses it.

use crate::graph::{CodeGraph, EdgeKind, GraphQuery, NodeKind};

/// Shared type-name resolution for class-level analyzers: exact `type:<input>`
/// id match, then the first class node whose qualified name ends with the
/// input, then the first such interface node.
pub(crate) fn resolve_type_id(graph: &CodeGraph, class_name: &str) -> Option<String> {
    let direct = format!("type:{class_name}");
    if graph.contains_node(&direct) {
        return Some(direct);
    }

    graph
        .nodes_by_kind(NodeKind::Class)
        .find(|n| n.qualified_name.ends_with(class_name))
        .or_else(|| {
            graph
                .nodes_by_kind(NodeKind::Interface)
                .find(|n| n.qualified_name.ends_with(class_name))
        })
        .map(|n| n.id.clone())
}

pub struct DependencyAnalyzer<'g> {
    graph: &'g CodeGraph,
}

impl<'g> DependencyAnalyzer<'g> {
    pub fn new(graph: &'g CodeGraph) -> Self {
        Self { graph }
    }

    /// Direct dependencies of a class: one hop over dependency-like edges.
    pub fn class_dependencies(&self, class_name: &str) -> CodeGraph {
        let Some(class_id) = resolve_type_id(self.graph, class_name) else {
            return CodeGraph::empty();
        };
        GraphQuery::new(self.graph).forward(
            &class_id,
            1,
            &[
                EdgeKind::Dependency,
                EdgeKind::Extends,
                EdgeKind::Implements,
                EdgeKind::Imports,
            ],
        )
    }

    /// Everything that transitively depends on a class.
    pub fn dependents(&self, class_name: &str) -> CodeGraph {
        let Some(class_id) = resolve_type_id(self.graph, class_name) else {
            return CodeGraph::empty();
        };
        GraphQuery::new(self.graph).reverse(
            &class_id,
            -1,
            &[EdgeKind::Dependency, EdgeKind::Extends, EdgeKind::Implements],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::model::ClassInfo;

    /// Web -> Core -> Db dependency chain via fields.
    fn fixture() -> CodeGraph {
        let mut web = ClassInfo::new("Web", "com.app");
        web.fields.push("Core core".to_string());
        let mut core = ClassInfo::new("Core", "com.app");
        core.fields.push("Db db".to_string());
        let db = ClassInfo::new("Db", "com.app");
        build_graph(&[web, core, db])
    }

    #[test]
    fn direct_dependencies_are_one_hop() {
        let graph = fixture();
        let analyzer = DependencyAnalyzer::new(&graph);
        let deps = analyzer.class_dependencies("Web");
        let ids: Vec<_> = deps.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["type:com.app.Web", "type:com.app.Core"]);
    }

    #[test]
    fn dependents_are_transitive() {
        let graph = fixture();
        let analyzer = DependencyAnalyzer::new(&graph);
        let dependents = analyzer.dependents("Db");
        assert_eq!(dependents.node_count(), 3);
    }

    #[test]
    fn suffix_resolution_prefers_classes_over_interfaces() {
        let mut iface = ClassInfo::new("Store", "com.spi");
        iface.is_interface = true;
        let class = ClassInfo::new("Store", "com.impl");
        // Interface declared first; class still wins the suffix scan.
        let graph = build_graph(&[iface, class]);
        assert_eq!(
            resolve_type_id(&graph, "Store").as_deref(),
            Some("type:com.impl.Store")
        );
    }

    #[test]
    fn unresolved_name_yields_empty_graph() {
        let graph = fixture();
        let analyzer = DependencyAnalyzer::new(&graph);
        assert_eq!(analyzer.class_dependencies("Ghost").node_count(), 0);
        assert_eq!(analyzer.dependents("Ghost").node_count(), 0);
    }
}
