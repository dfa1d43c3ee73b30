//! Enforces a layered architecture over DEPENDENCY edges.
//!
//! Layers are ordered outermost-first (e.g. controller, service,
//! repository, model). A type belongs to the first layer whose name occurs
//! in its lowercased qualified name. A dependency from an inner layer back
//! out to an outer one is a violation; unlayered types are ignored.

use serde_json::Value;

use crate::graph::{CodeGraph, EdgeKind};

use super::{ArchitectureRule, Severity, Violation};

pub struct LayerViolationRule {
    layer_order: Vec<String>,
}

impl LayerViolationRule {
    pub fn new() -> Self {
        Self {
            layer_order: ["controller", "service", "repository", "model"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    fn layer_of(&self, qualified_name: &str) -> Option<usize> {
        let lowered = qualified_name.to_lowercase();
        self.layer_order.iter().position(|l| lowered.contains(l))
    }
}

impl Default for LayerViolationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchitectureRule for LayerViolationRule {
    fn name(&self) -> &str {
        "layer-violation"
    }

    fn description(&self) -> &str {
        "Dependencies that point from an inner layer to an outer one"
    }

    fn configure(&mut self, settings: &Value) {
        if let Some(layers) = settings.get("layerOrder").and_then(Value::as_array) {
            let parsed: Vec<String> = layers
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.to_lowercase())
                .collect();
            if !parsed.is_empty() {
                self.layer_order = parsed;
            }
        }
    }

    fn evaluate(&self, graph: &CodeGraph) -> Vec<Violation> {
        let mut violations = Vec::new();
        for edge in graph.edges().iter().filter(|e| e.kind == EdgeKind::Dependency) {
            let (Some(source), Some(target)) =
                (graph.node(&edge.source_id), graph.node(&edge.target_id))
            else {
                continue;
            };
            let (Some(source_layer), Some(target_layer)) = (
                self.layer_of(&source.qualified_name),
                self.layer_of(&target.qualified_name),
            ) else {
                continue;
            };

            if source_layer > target_layer {
                violations.push(Violation::at_node(
                    self.name(),
                    Severity::Error,
                    format!(
                        "{} ({}) must not depend on {} ({})",
                        source.qualified_name,
                        self.layer_order[source_layer],
                        target.qualified_name,
                        self.layer_order[target_layer],
                    ),
                    source,
                ));
            }
        }
        violations
    }
}
