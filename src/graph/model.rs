//! Immutable node/edge container with id lookup and adjacency indices.
//!
//! A `CodeGraph` is built once per analysis run and held read-only; every
//! query result is a fresh graph produced by `subgraph`.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// What a graph node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Class,
    Interface,
    Enum,
    Method,
    Constructor,
}

impl NodeKind {
    /// True for class-like nodes (the targets of class-level analysis).
    pub fn is_type(self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Interface | NodeKind::Enum)
    }
}

/// Relation carried by a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    Calls,
    Extends,
    Implements,
    Dependency,
    Imports,
    Overrides,
    Contains,
}

impl EdgeKind {
    /// Name used in derived edge ids and wire output.
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Calls => "CALLS",
            EdgeKind::Extends => "EXTENDS",
            EdgeKind::Implements => "IMPLEMENTS",
            EdgeKind::Dependency => "DEPENDENCY",
            EdgeKind::Imports => "IMPORTS",
            EdgeKind::Overrides => "OVERRIDES",
            EdgeKind::Contains => "CONTAINS",
        }
    }
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// A vertex in the code graph: one declared type or member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Globally unique id: `type:<qualified>` or `method:<qualified>.<sig>`.
    pub id: String,
    pub name: String,
    pub qualified_name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "is_zero", default)]
    pub line_number: u32,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub metadata: BTreeMap<String, String>,
}

impl GraphNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        qualified_name: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        let id = id.into();
        assert!(!id.is_empty(), "graph node requires an id");
        Self {
            id,
            name: name.into(),
            qualified_name: qualified_name.into(),
            kind,
            file_path: None,
            line_number: 0,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_location(mut self, file_path: impl Into<String>, line_number: u32) -> Self {
        self.file_path = Some(file_path.into());
        self.line_number = line_number;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A directed, typed relation between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Derived as `<source>-<KIND>-<target>`, so structurally identical
    /// edges collapse to the same identity.
    pub id: String,
    #[serde(rename = "source")]
    pub source_id: String,
    #[serde(rename = "target")]
    pub target_id: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub metadata: BTreeMap<String, String>,
}

impl GraphEdge {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, kind: EdgeKind) -> Self {
        let source_id = source_id.into();
        let target_id = target_id.into();
        assert!(
            !source_id.is_empty() && !target_id.is_empty(),
            "graph edge requires both endpoints"
        );
        let id = format!("{}-{}-{}", source_id, kind.as_str(), target_id);
        Self {
            id,
            source_id,
            target_id,
            kind,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// The complete code graph: ordered nodes and edges plus derived indices.
///
/// Immutable after construction. `subgraph` is the universal mechanism by
/// which analyzers return results — it keeps exactly the requested node ids
/// and every edge whose both endpoints survive.
#[derive(Debug, Clone, Serialize)]
pub struct CodeGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    outgoing: HashMap<String, Vec<usize>>,
    #[serde(skip)]
    incoming: HashMap<String, Vec<usize>>,
}

impl CodeGraph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut node_index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            node_index.insert(node.id.clone(), i);
        }

        let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.source_id.clone()).or_default().push(i);
            incoming.entry(edge.target_id.clone()).or_default().push(i);
        }

        Self {
            nodes,
            edges,
            node_index,
            outgoing,
            incoming,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// O(1) node lookup by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Nodes of the given kind, in insertion order.
    pub fn nodes_by_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Edges of the given kind, in insertion order.
    pub fn edges_by_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Outgoing edges of a node, in insertion order.
    pub fn outgoing_edges(&self, node_id: &str) -> impl Iterator<Item = &GraphEdge> {
        self.outgoing
            .get(node_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
    }

    /// Incoming edges of a node, in insertion order.
    pub fn incoming_edges(&self, node_id: &str) -> impl Iterator<Item = &GraphEdge> {
        self.incoming
            .get(node_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
    }

    /// Extract a new graph containing exactly the given node ids (those
    /// present in this graph) and the edges whose both endpoints survive.
    pub fn subgraph(&self, node_ids: &HashSet<String>) -> CodeGraph {
        let nodes: Vec<GraphNode> = self
            .nodes
            .iter()
            .filter(|n| node_ids.contains(&n.id))
            .cloned()
            .collect();
        let edges: Vec<GraphEdge> = self
            .edges
            .iter()
            .filter(|e| node_ids.contains(&e.source_id) && node_ids.contains(&e.target_id))
            .cloned()
            .collect();
        CodeGraph::new(nodes, edges)
    }
}
