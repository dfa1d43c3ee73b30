//! Architecture rules: pluggable checks evaluated against the built graph.
//!
//! A rule inspects the whole [`CodeGraph`] and reports [`Violation`]s.
//! The engine ships with a default set; rules can be added, removed, and
//! configured (typically from the `[rules.*]` sections of `codemap.toml`).

mod circular_dependency;
mod deep_inheritance;
mod god_class;
mod layer_violation;
mod unused_class;

pub use circular_dependency::CircularDependencyRule;
pub use deep_inheritance::DeepInheritanceRule;
pub use god_class::GodClassRule;
pub use layer_violation::LayerViolationRule;
pub use unused_class::UnusedClassRule;

use serde::Serialize;

use crate::config::CodemapConfig;
use crate::graph::{CodeGraph, GraphNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One rule finding, tied to a graph node where one is responsible.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule_name: String,
    pub severity: Severity,
    pub message: String,
    pub node_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "line_is_unknown")]
    pub line_number: u32,
}

fn line_is_unknown(line: &u32) -> bool {
    *line == 0
}

impl Violation {
    /// Build a violation located at the given node.
    pub fn at_node(rule_name: &str, severity: Severity, message: String, node: &GraphNode) -> Self {
        Self {
            rule_name: rule_name.to_string(),
            severity,
            message,
            node_id: node.id.clone(),
            file_path: node.file_path.clone(),
            line_number: node.line_number,
        }
    }
}

pub trait ArchitectureRule: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn evaluate(&self, graph: &CodeGraph) -> Vec<Violation>;
    /// Apply rule-specific settings. Rules ignore keys they do not know.
    fn configure(&mut self, _settings: &serde_json::Value) {}
}

pub struct RuleEngine {
    rules: Vec<Box<dyn ArchitectureRule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    /// Engine with the default rule set. The layer-violation rule is not
    /// part of it; it only joins once configured with a layer order.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(CircularDependencyRule::new()),
                Box::new(GodClassRule::new()),
                Box::new(DeepInheritanceRule::new()),
                Box::new(UnusedClassRule::new()),
            ],
        }
    }

    /// Default rules plus whatever `[rules.*]` sections configure.
    pub fn from_config(config: &CodemapConfig) -> Self {
        let mut engine = Self::new();
        for (name, settings) in &config.rules {
            engine.configure_rule(name, settings);
        }
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ArchitectureRule>) {
        self.rules.push(rule);
    }

    pub fn remove_rule(&mut self, name: &str) {
        self.rules.retain(|r| r.name() != name);
    }

    /// Configure the named rule, instantiating the layer-violation rule on
    /// first mention. Unknown names are ignored.
    pub fn configure_rule(&mut self, name: &str, settings: &serde_json::Value) {
        if name == "layer-violation" && !self.rules.iter().any(|r| r.name() == name) {
            self.rules.push(Box::new(LayerViolationRule::new()));
        }
        if let Some(rule) = self.rules.iter_mut().find(|r| r.name() == name) {
            rule.configure(settings);
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn ArchitectureRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Run every rule, in registration order.
    pub fn evaluate(&self, graph: &CodeGraph) -> Vec<Violation> {
        self.rules.iter().flat_map(|r| r.evaluate(graph)).collect()
    }
}
