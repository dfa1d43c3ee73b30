//! Circular-dependency detection via Tarjan's strongly-connected-components
//! algorithm, restricted to the class-level subgraph.

use std::collections::{HashMap, HashSet};

use crate::graph::{CodeGraph, EdgeKind};

const CLASS_EDGES: [EdgeKind; 3] = [EdgeKind::Dependency, EdgeKind::Extends, EdgeKind::Implements];

pub struct CircularDependencyDetector<'g> {
    graph: &'g CodeGraph,
}

struct TarjanState<'g> {
    graph: &'g CodeGraph,
    class_ids: HashSet<&'g str>,
    index: HashMap<&'g str, usize>,
    low_link: HashMap<&'g str, usize>,
    on_stack: HashSet<&'g str>,
    stack: Vec<&'g str>,
    counter: usize,
    components: Vec<Vec<String>>,
}

impl<'g> CircularDependencyDetector<'g> {
    pub fn new(graph: &'g CodeGraph) -> Self {
        Self { graph }
    }

    /// All dependency cycles between declared types.
    ///
    /// Runs Tarjan SCC over type/interface/enum nodes and
    /// DEPENDENCY/EXTENDS/IMPLEMENTS edges, visiting roots in node insertion
    /// order, and reports each component of size >= 2 as one cycle group.
    /// A single node is never a cycle, so a direct self-loop goes
    /// unreported.
    pub fn detect(&self) -> Vec<Vec<String>> {
        let class_ids: HashSet<&str> = self
            .graph
            .nodes()
            .iter()
            .filter(|n| n.kind.is_type())
            .map(|n| n.id.as_str())
            .collect();

        let mut state = TarjanState {
            graph: self.graph,
            class_ids,
            index: HashMap::new(),
            low_link: HashMap::new(),
            on_stack: HashSet::new(),
            stack: Vec::new(),
            counter: 0,
            components: Vec::new(),
        };

        for node in self.graph.nodes() {
            if node.kind.is_type() && !state.index.contains_key(node.id.as_str()) {
                state.strong_connect(&node.id);
            }
        }

        state
            .components
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .collect()
    }
}

impl<'g> TarjanState<'g> {
    fn strong_connect(&mut self, node_id: &'g str) {
        self.index.insert(node_id, self.counter);
        self.low_link.insert(node_id, self.counter);
        self.counter += 1;
        self.stack.push(node_id);
        self.on_stack.insert(node_id);

        let neighbors: Vec<&'g str> = self
            .graph
            .outgoing_edges(node_id)
            .filter(|e| CLASS_EDGES.contains(&e.kind))
            .map(|e| e.target_id.as_str())
            .filter(|t| self.class_ids.contains(t))
            .collect();

        for target in neighbors {
            if !self.index.contains_key(target) {
                self.strong_connect(target);
                let target_low = self.low_link[target];
                let low = self.low_link.get_mut(node_id).expect("visited node");
                *low = (*low).min(target_low);
            } else if self.on_stack.contains(target) {
                let target_index = self.index[target];
                let low = self.low_link.get_mut(node_id).expect("visited node");
                *low = (*low).min(target_index);
            }
        }

        if self.low_link[node_id] == self.index[node_id] {
            let mut component = Vec::new();
            loop {
                let member = self.stack.pop().expect("stack holds the current root");
                self.on_stack.remove(member);
                component.push(member.to_string());
                if member == node_id {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::model::{ClassInfo, MethodInfo};

    fn extends(name: &str, super_class: &str) -> ClassInfo {
        let mut cls = ClassInfo::new(name, "com.app");
        cls.super_class = Some(super_class.to_string());
        cls
    }

    #[test]
    fn three_class_extends_cycle_is_one_component() {
        let graph = build_graph(&[extends("A", "B"), extends("B", "C"), extends("C", "A")]);
        let cycles = CircularDependencyDetector::new(&graph).detect();

        assert_eq!(cycles.len(), 1);
        let members: HashSet<_> = cycles[0].iter().map(String::as_str).collect();
        assert_eq!(
            members,
            ["type:com.app.A", "type:com.app.B", "type:com.app.C"]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn acyclic_graph_reports_nothing() {
        let graph = build_graph(&[extends("A", "B"), extends("B", "C"), ClassInfo::new("C", "com.app")]);
        assert!(CircularDependencyDetector::new(&graph).detect().is_empty());
    }

    #[test]
    fn two_independent_cycles_are_separate_components() {
        let mut d = ClassInfo::new("D", "com.app");
        d.fields.push("E e".to_string());
        let mut e = ClassInfo::new("E", "com.app");
        e.fields.push("D d".to_string());

        let graph = build_graph(&[
            extends("A", "B"),
            extends("B", "A"),
            d,
            e,
        ]);
        let cycles = CircularDependencyDetector::new(&graph).detect();
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn call_cycles_between_methods_are_not_class_cycles() {
        let mut a = ClassInfo::new("A", "com.app");
        let mut ping = MethodInfo::new("ping", "com.app.A", Vec::new());
        ping.method_calls.push("pong".to_string());
        let mut pong = MethodInfo::new("pong", "com.app.A", Vec::new());
        pong.method_calls.push("ping".to_string());
        a.methods.push(ping);
        a.methods.push(pong);

        let graph = build_graph(&[a]);
        assert!(CircularDependencyDetector::new(&graph).detect().is_empty());
    }

    #[test]
    fn self_extends_is_not_reported() {
        let graph = build_graph(&[extends("A", "A")]);
        assert!(CircularDependencyDetector::new(&graph).detect().is_empty());
    }
}
