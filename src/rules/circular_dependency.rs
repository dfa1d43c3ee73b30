//! Rule wrapper around the cycle detector.

use crate::analysis::CircularDependencyDetector;
use crate::graph::CodeGraph;

use super::{ArchitectureRule, Severity, Violation};

#[derive(Default)]
pub struct CircularDependencyRule;

impl CircularDependencyRule {
    pub fn new() -> Self {
        Self
    }
}

impl ArchitectureRule for CircularDependencyRule {
    fn name(&self) -> &str {
        "circular-dependency"
    }

    fn description(&self) -> &str {
        "Dependency cycles between types"
    }

    /// One violation per cycle group, anchored at the group's first node.
    fn evaluate(&self, graph: &CodeGraph) -> Vec<Violation> {
        CircularDependencyDetector::new(graph)
            .detect()
            .into_iter()
            .filter_map(|cycle| {
                let anchor = graph.node(cycle.first()?)?;
                Some(Violation::at_node(
                    self.name(),
                    Severity::Warning,
                    format!("dependency cycle: {}", cycle.join(" -> ")),
                    anchor,
                ))
            })
            .collect()
    }
}
