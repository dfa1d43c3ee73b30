//! Surfaces types nothing in the analyzed project refers to.

use crate::graph::{CodeGraph, EdgeKind};

use super::{ArchitectureRule, Severity, Violation};

/// A type with no incoming DEPENDENCY, EXTENDS, or IMPLEMENTS edge. Entry
/// points naturally show up here, so findings are informational.
#[derive(Default)]
pub struct UnusedClassRule;

impl UnusedClassRule {
    pub fn new() -> Self {
        Self
    }
}

impl ArchitectureRule for UnusedClassRule {
    fn name(&self) -> &str {
        "unused-class"
    }

    fn description(&self) -> &str {
        "Types no other type depends on"
    }

    fn evaluate(&self, graph: &CodeGraph) -> Vec<Violation> {
        graph
            .nodes()
            .iter()
            .filter(|n| n.kind.is_type())
            .filter(|node| {
                !graph.incoming_edges(&node.id).any(|e| {
                    matches!(
                        e.kind,
                        EdgeKind::Dependency | EdgeKind::Extends | EdgeKind::Implements
                    )
                })
            })
            .map(|node| {
                Violation::at_node(
                    self.name(),
                    Severity::Info,
                    format!("{} has no inbound dependencies", node.qualified_name),
                    node,
                )
            })
            .collect()
    }
}
