//! Flags inheritance chains that grow past a configured depth.

use std::collections::HashSet;

use serde_json::Value;

use crate::graph::{CodeGraph, EdgeKind};

use super::{ArchitectureRule, Severity, Violation};

pub struct DeepInheritanceRule {
    max_depth: usize,
}

impl DeepInheritanceRule {
    pub fn new() -> Self {
        Self { max_depth: 4 }
    }

    /// Length of the EXTENDS chain starting at a node. Only superclasses
    /// present in the graph count; a cycle terminates the walk.
    fn chain_depth(graph: &CodeGraph, start_id: &str) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        let mut current = start_id.to_string();
        let mut depth = 0;

        while seen.insert(current.clone()) {
            let parent = graph
                .outgoing_edges(&current)
                .find(|e| e.kind == EdgeKind::Extends)
                .map(|e| e.target_id.clone());
            match parent {
                Some(parent) => {
                    depth += 1;
                    current = parent;
                }
                None => break,
            }
        }
        depth
    }
}

impl Default for DeepInheritanceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchitectureRule for DeepInheritanceRule {
    fn name(&self) -> &str {
        "deep-inheritance"
    }

    fn description(&self) -> &str {
        "Inheritance chains deeper than the configured limit"
    }

    fn configure(&mut self, settings: &Value) {
        if let Some(n) = settings.get("maxDepth").and_then(Value::as_u64) {
            self.max_depth = n as usize;
        }
    }

    fn evaluate(&self, graph: &CodeGraph) -> Vec<Violation> {
        graph
            .nodes()
            .iter()
            .filter(|n| n.kind.is_type())
            .filter_map(|node| {
                let depth = Self::chain_depth(graph, &node.id);
                (depth > self.max_depth).then(|| {
                    Violation::at_node(
                        self.name(),
                        Severity::Warning,
                        format!(
                            "{} sits {} levels deep in an inheritance chain (limit {})",
                            node.qualified_name, depth, self.max_depth
                        ),
                        node,
                    )
                })
            })
            .collect()
    }
}
