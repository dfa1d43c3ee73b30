//! Flags types that have accumulated too many members or dependencies.

use serde_json::Value;

use crate::graph::{CodeGraph, EdgeKind};

use super::{ArchitectureRule, Severity, Violation};

pub struct GodClassRule {
    max_methods: usize,
    max_dependencies: usize,
}

impl GodClassRule {
    pub fn new() -> Self {
        Self {
            max_methods: 20,
            max_dependencies: 15,
        }
    }
}

impl Default for GodClassRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchitectureRule for GodClassRule {
    fn name(&self) -> &str {
        "god-class"
    }

    fn description(&self) -> &str {
        "Types with too many members or outgoing dependencies"
    }

    fn configure(&mut self, settings: &Value) {
        if let Some(n) = settings.get("maxMethods").and_then(Value::as_u64) {
            self.max_methods = n as usize;
        }
        if let Some(n) = settings.get("maxDependencies").and_then(Value::as_u64) {
            self.max_dependencies = n as usize;
        }
    }

    fn evaluate(&self, graph: &CodeGraph) -> Vec<Violation> {
        let mut violations = Vec::new();
        for node in graph.nodes().iter().filter(|n| n.kind.is_type()) {
            let members = graph
                .outgoing_edges(&node.id)
                .filter(|e| e.kind == EdgeKind::Contains)
                .count();
            let dependencies = graph
                .outgoing_edges(&node.id)
                .filter(|e| e.kind == EdgeKind::Dependency)
                .count();

            if members > self.max_methods {
                violations.push(Violation::at_node(
                    self.name(),
                    Severity::Warning,
                    format!(
                        "{} has {} members (limit {})",
                        node.qualified_name, members, self.max_methods
                    ),
                    node,
                ));
            }
            if dependencies > self.max_dependencies {
                violations.push(Violation::at_node(
                    self.name(),
                    Severity::Warning,
                    format!(
                        "{} has {} outgoing dependencies (limit {})",
                        node.qualified_name, dependencies, self.max_dependencies
                    ),
                    node,
                ));
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::model::{ClassInfo, MethodInfo};

    #[test]
    fn small_class_passes_defaults() {
        let mut cls = ClassInfo::new("Small", "com.app");
        cls.methods.push(MethodInfo::new("go", "com.app.Small", Vec::new()));
        let graph = build_graph(&[cls]);
        assert!(GodClassRule::new().evaluate(&graph).is_empty());
    }

    #[test]
    fn member_count_over_configured_limit_is_flagged() {
        let mut cls = ClassInfo::new("Big", "com.app");
        for i in 0..3 {
            cls.methods
                .push(MethodInfo::new(format!("m{i}"), "com.app.Big", Vec::new()));
        }
        let graph = build_graph(&[cls]);

        let mut rule = GodClassRule::new();
        rule.configure(&serde_json::json!({ "maxMethods": 2 }));
        let violations = rule.evaluate(&graph);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].node_id, "type:com.app.Big");
    }

    #[test]
    fn dependency_fanout_is_flagged_separately() {
        let mut cls = ClassInfo::new("Hub", "com.app");
        cls.fields.push("A a".to_string());
        cls.fields.push("B b".to_string());
        let a = ClassInfo::new("A", "com.app");
        let b = ClassInfo::new("B", "com.app");
        let graph = build_graph(&[cls, a, b]);

        let mut rule = GodClassRule::new();
        rule.configure(&serde_json::json!({ "maxDependencies": 1 }));
        let violations = rule.evaluate(&graph);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("outgoing dependencies"));
    }
}
