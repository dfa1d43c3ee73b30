//! Turns parsed declarations into one unified, cross-file code graph.
//!
//! Pass 1 creates type and member nodes and fills two lookup tables; pass 2
//! resolves symbolic references (supertypes, interfaces, call targets, field
//! and import types) against those tables and emits edges.
//!
//! Resolution is heuristic — there is no type checker behind it. Each
//! resolver tries a fixed fallback chain and the first hit wins; the probe
//! order is observable behavior and must not be reordered. Unresolved names
//! produce no edge and no error.

use std::collections::{HashMap, HashSet};

use tracing::info;

use super::model::{CodeGraph, EdgeKind, GraphEdge, GraphNode, NodeKind};
use crate::model::ClassInfo;

/// Lookup tables built in pass 1, read-only in pass 2.
struct SymbolTables {
    /// Qualified name (and bare name, as fallback) -> type node id.
    type_ids: HashMap<String, String>,
    /// Qualified type names in declaration order, for deterministic scans.
    type_order: Vec<String>,
    /// `class.signature`, `class.name`, and bare `name` -> member node id.
    /// Later declarations overwrite earlier ones on key collision.
    method_ids: HashMap<String, String>,
}

/// Build a code graph from the full declaration set of one analysis run.
pub fn build_graph(classes: &[ClassInfo]) -> CodeGraph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut seen_edges: HashSet<String> = HashSet::new();

    let mut tables = SymbolTables {
        type_ids: HashMap::new(),
        type_order: Vec::new(),
        method_ids: HashMap::new(),
    };

    // --- Pass 1: nodes and lookup tables ---
    for cls in classes {
        let class_id = format!("type:{}", cls.qualified_name);
        let kind = if cls.is_interface {
            NodeKind::Interface
        } else if cls.is_enum {
            NodeKind::Enum
        } else {
            NodeKind::Class
        };

        nodes.push(
            GraphNode::new(&class_id, &cls.name, &cls.qualified_name, kind)
                .with_location(&cls.file_path, cls.line_number)
                .with_metadata("package", &cls.package_name)
                .with_metadata("isAbstract", cls.is_abstract.to_string()),
        );

        tables
            .type_ids
            .insert(cls.qualified_name.clone(), class_id.clone());
        tables.type_ids.insert(cls.name.clone(), class_id.clone());
        tables.type_order.push(cls.qualified_name.clone());

        for method in &cls.methods {
            let qualified = format!("{}.{}", cls.qualified_name, method.signature);
            let method_id = format!("method:{qualified}");
            let kind = if method.is_constructor {
                NodeKind::Constructor
            } else {
                NodeKind::Method
            };

            nodes.push(
                GraphNode::new(&method_id, &method.name, &qualified, kind)
                    .with_location(&cls.file_path, method.line_number)
                    .with_metadata(
                        "returnType",
                        method.return_type.as_deref().unwrap_or("void"),
                    )
                    .with_metadata("access", &method.access_modifier)
                    .with_metadata("isStatic", method.is_static.to_string()),
            );

            tables.method_ids.insert(qualified, method_id.clone());
            tables.method_ids.insert(
                format!("{}.{}", cls.qualified_name, method.name),
                method_id.clone(),
            );
            tables.method_ids.insert(method.name.clone(), method_id.clone());

            push_edge(
                &mut edges,
                &mut seen_edges,
                GraphEdge::new(&class_id, &method_id, EdgeKind::Contains),
            );
        }
    }

    // --- Pass 2: reference edges ---
    for cls in classes {
        let class_id = &tables.type_ids[&cls.qualified_name];

        if let Some(super_class) = cls.super_class.as_deref().filter(|s| !s.is_empty()) {
            if let Some(super_id) = resolve_type_id(super_class, cls, &tables) {
                push_edge(
                    &mut edges,
                    &mut seen_edges,
                    GraphEdge::new(class_id, super_id, EdgeKind::Extends),
                );
            }
        }

        for iface in &cls.interfaces {
            if let Some(iface_id) = resolve_type_id(iface, cls, &tables) {
                push_edge(
                    &mut edges,
                    &mut seen_edges,
                    GraphEdge::new(class_id, iface_id, EdgeKind::Implements),
                );
            }
        }

        for method in &cls.methods {
            let key = format!("{}.{}", cls.qualified_name, method.signature);
            let Some(method_id) = tables.method_ids.get(&key) else {
                continue;
            };

            for call in &method.method_calls {
                if let Some(target_id) = resolve_method_id(call, cls, &tables) {
                    if target_id != *method_id {
                        push_edge(
                            &mut edges,
                            &mut seen_edges,
                            GraphEdge::new(method_id, target_id, EdgeKind::Calls),
                        );
                    }
                }
            }
        }

        // Field-typed dependencies, one edge per distinct target.
        let mut dep_targets: HashSet<String> = HashSet::new();
        for field in &cls.fields {
            let Some(type_name) = field.split_whitespace().next() else {
                continue;
            };
            if let Some(dep_id) = resolve_type_id(type_name, cls, &tables) {
                if dep_id != *class_id && dep_targets.insert(dep_id.to_string()) {
                    push_edge(
                        &mut edges,
                        &mut seen_edges,
                        GraphEdge::new(class_id, dep_id, EdgeKind::Dependency)
                            .with_metadata("via", "field"),
                    );
                }
            }
        }

        // Import dependencies, when the imported type exists in the codebase
        // and no field already established the edge.
        for imp in &cls.imports {
            if let Some(dep_id) = tables.type_ids.get(imp) {
                if dep_id != class_id && dep_targets.insert(dep_id.clone()) {
                    push_edge(
                        &mut edges,
                        &mut seen_edges,
                        GraphEdge::new(class_id, dep_id, EdgeKind::Dependency)
                            .with_metadata("via", "import"),
                    );
                }
            }
        }
    }

    info!(
        nodes = nodes.len(),
        edges = edges.len(),
        "built code graph"
    );
    CodeGraph::new(nodes, edges)
}

/// Append an edge unless a structurally identical one exists already.
fn push_edge(edges: &mut Vec<GraphEdge>, seen: &mut HashSet<String>, edge: GraphEdge) {
    if seen.insert(edge.id.clone()) {
        edges.push(edge);
    }
}

/// Resolve a type name to a type node id. Fallback chain, first hit wins:
/// exact qualified name, same-package name, import suffix match, then a
/// verbatim `type:<name>` scan in declaration order.
fn resolve_type_id<'t>(name: &str, context: &ClassInfo, tables: &'t SymbolTables) -> Option<&'t str> {
    if let Some(id) = tables.type_ids.get(name) {
        return Some(id);
    }

    let in_package = format!("{}.{}", context.package_name, name);
    if let Some(id) = tables.type_ids.get(&in_package) {
        return Some(id);
    }

    let suffix = format!(".{name}");
    for imp in &context.imports {
        if imp.ends_with(&suffix) {
            if let Some(id) = tables.type_ids.get(imp) {
                return Some(id);
            }
        }
    }

    let prefixed = format!("type:{name}");
    for qualified in &tables.type_order {
        let id = &tables.type_ids[qualified];
        if *id == prefixed {
            return Some(id);
        }
    }

    None
}

/// Resolve a raw call string to a member node id.
///
/// Scoped calls (`scope.member`) probe, in order: a fully-qualified guess in
/// the caller's package, the scope resolved as a type, every imported type,
/// then every type in the caller's package. Unscoped calls assume a member
/// of the calling type. Can both under- and over-resolve; the output is
/// advisory.
fn resolve_method_id<'t>(
    call: &str,
    context: &ClassInfo,
    tables: &'t SymbolTables,
) -> Option<&'t str> {
    if let Some(id) = tables.method_ids.get(call) {
        return Some(id);
    }

    if let Some((scope, member)) = call.split_once('.') {
        let guess = format!("{}.{}.{}", context.package_name, scope, member);
        if let Some(id) = tables.method_ids.get(&guess) {
            return Some(id);
        }

        if let Some(type_id) = resolve_type_id(scope, context, tables) {
            let class_name = type_id.trim_start_matches("type:");
            if let Some(id) = tables.method_ids.get(&format!("{class_name}.{member}")) {
                return Some(id);
            }
        }

        for imp in &context.imports {
            if tables.type_ids.contains_key(imp) {
                if let Some(id) = tables.method_ids.get(&format!("{imp}.{member}")) {
                    return Some(id);
                }
            }
        }

        let package_prefix = format!("{}.", context.package_name);
        for qualified in &tables.type_order {
            if qualified.starts_with(&package_prefix) {
                if let Some(id) = tables.method_ids.get(&format!("{qualified}.{member}")) {
                    return Some(id);
                }
            }
        }
    } else if let Some(id) = tables
        .method_ids
        .get(&format!("{}.{}", context.qualified_name, call))
    {
        return Some(id);
    }

    None
}
