//! Java declaration extraction on top of tree-sitter.
//!
//! Pulls out exactly what the graph builder needs: type declarations with
//! their supertypes, interfaces, fields, imports, and members with raw call
//! targets. No name binding happens here — call strings are recorded as
//! written (`scope.name` or bare `name`) and resolved later.

use tree_sitter::{Language, Node, Parser};

use crate::error::{CodemapError, Result};
use crate::model::{ClassInfo, MethodInfo};

fn language() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

/// Parse one Java source file into declaration records. A file declaring
/// several types (nested or top-level) yields one record per type.
pub fn parse_source(file_path: &str, source: &str) -> Result<Vec<ClassInfo>> {
    let mut parser = Parser::new();
    parser
        .set_language(&language())
        .map_err(|e| CodemapError::Parse {
            path: file_path.into(),
            message: e.to_string(),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| CodemapError::Parse {
            path: file_path.into(),
            message: "tree-sitter produced no syntax tree".to_string(),
        })?;

    let root = tree.root_node();
    let package = package_name(root, source);
    let imports = collect_imports(root, source);

    let mut classes = Vec::new();
    collect_types(root, &package, &imports, file_path, source, &mut classes);
    Ok(classes)
}

fn text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn package_name(root: Node, source: &str) -> String {
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "package_declaration" {
            let mut inner = child.walk();
            for part in child.named_children(&mut inner) {
                if matches!(part.kind(), "scoped_identifier" | "identifier") {
                    return text(part, source).to_string();
                }
            }
        }
    }
    String::new()
}

fn collect_imports(root: Node, source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "import_declaration" {
            let mut inner = child.walk();
            // Wildcard imports keep just the package part, like the
            // asterisk never happened.
            for part in child.named_children(&mut inner) {
                if matches!(part.kind(), "scoped_identifier" | "identifier") {
                    imports.push(text(part, source).to_string());
                    break;
                }
            }
        }
    }
    imports
}

/// Depth-first scan for type declarations; nested and local types are
/// visited the same as top-level ones.
fn collect_types(
    node: Node,
    package: &str,
    imports: &[String],
    file_path: &str,
    source: &str,
    classes: &mut Vec<ClassInfo>,
) {
    if matches!(
        node.kind(),
        "class_declaration" | "interface_declaration" | "enum_declaration"
    ) {
        if let Some(cls) = extract_type(node, package, imports, file_path, source) {
            classes.push(cls);
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_types(child, package, imports, file_path, source, classes);
    }
}

fn extract_type(
    node: Node,
    package: &str,
    imports: &[String],
    file_path: &str,
    source: &str,
) -> Option<ClassInfo> {
    // Error-recovery trees can carry a declaration with no name; skip it.
    let name = node.child_by_field_name("name").map(|n| text(n, source))?;
    if name.is_empty() {
        return None;
    }

    let mut cls = ClassInfo::new(name, package);
    cls.file_path = file_path.to_string();
    cls.line_number = node.start_position().row as u32 + 1;
    cls.is_interface = node.kind() == "interface_declaration";
    cls.is_enum = node.kind() == "enum_declaration";
    cls.imports = imports.to_vec();

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "modifiers" => {
                let mut inner = child.walk();
                for modifier in child.children(&mut inner) {
                    match modifier.kind() {
                        "abstract" => cls.is_abstract = true,
                        "marker_annotation" | "annotation" => {
                            if let Some(n) = modifier.child_by_field_name("name") {
                                cls.annotations.push(text(n, source).to_string());
                            }
                        }
                        _ => {}
                    }
                }
            }
            "superclass" => {
                let mut inner = child.walk();
                if let Some(ty) = child.named_children(&mut inner).next() {
                    cls.super_class = Some(simple_type_name(ty, source));
                };
            }
            "super_interfaces" | "extends_interfaces" => {
                let mut inner = child.walk();
                for list in child.named_children(&mut inner) {
                    if list.kind() == "type_list" {
                        let mut types = list.walk();
                        for ty in list.named_children(&mut types) {
                            cls.interfaces.push(simple_type_name(ty, source));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        extract_members(body, &mut cls, source);
    }

    Some(cls)
}

/// Direct members of a type body. For enums the member declarations sit one
/// level deeper, behind the constant list.
fn extract_members(body: Node, cls: &mut ClassInfo, source: &str) {
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "field_declaration" | "constant_declaration" => {
                if let Some(ty) = member.child_by_field_name("type") {
                    let type_text = text(ty, source).to_string();
                    let mut inner = member.walk();
                    for declarator in member.children_by_field_name("declarator", &mut inner) {
                        if let Some(n) = declarator.child_by_field_name("name") {
                            cls.fields.push(format!("{} {}", type_text, text(n, source)));
                        }
                    }
                }
            }
            "method_declaration" => {
                if let Some(m) = extract_method(member, &cls.qualified_name, source, false) {
                    cls.methods.push(m);
                }
            }
            "constructor_declaration" => {
                if let Some(m) = extract_method(member, &cls.qualified_name, source, true) {
                    cls.methods.push(m);
                }
            }
            "enum_body_declarations" => extract_members(member, cls, source),
            _ => {}
        }
    }
}

fn extract_method(
    node: Node,
    class_name: &str,
    source: &str,
    is_constructor: bool,
) -> Option<MethodInfo> {
    let name = node.child_by_field_name("name").map(|n| text(n, source))?;
    if name.is_empty() {
        return None;
    }

    let parameter_types = parameter_types(node, source);
    let mut method = MethodInfo::new(name, class_name, parameter_types);
    method.line_number = node.start_position().row as u32 + 1;
    method.is_constructor = is_constructor;

    if !is_constructor {
        method.return_type = node
            .child_by_field_name("type")
            .map(|t| text(t, source).to_string());
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "modifiers" {
            let mut inner = child.walk();
            for modifier in child.children(&mut inner) {
                match modifier.kind() {
                    "static" => method.is_static = true,
                    "abstract" => method.is_abstract = true,
                    "public" | "protected" | "private" => {
                        method.access_modifier = modifier.kind().to_string();
                    }
                    "marker_annotation" | "annotation" => {
                        if let Some(n) = modifier.child_by_field_name("name") {
                            method.annotations.push(text(n, source).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        collect_calls(body, source, &mut method.method_calls);
    }

    Some(method)
}

fn parameter_types(node: Node, source: &str) -> Vec<String> {
    let Some(params) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut types = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "formal_parameter" => {
                if let Some(ty) = param.child_by_field_name("type") {
                    types.push(text(ty, source).to_string());
                }
            }
            "spread_parameter" => {
                let mut inner = param.walk();
                if let Some(ty) = param.named_children(&mut inner).next() {
                    types.push(format!("{}...", text(ty, source)));
                };
            }
            _ => {}
        }
    }
    types
}

/// Record every method invocation in a subtree as `scope.name` (scoped) or
/// bare `name`.
fn collect_calls(node: Node, source: &str, out: &mut Vec<String>) {
    if node.kind() == "method_invocation" {
        if let Some(name) = node.child_by_field_name("name") {
            let name = text(name, source);
            let call = match node.child_by_field_name("object") {
                Some(object) => format!("{}.{}", text(object, source), name),
                None => name.to_string(),
            };
            out.push(call);
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_calls(child, source, out);
    }
}

/// Base identifier of a type reference: strips generics, arrays, and
/// qualifying scopes, mirroring how supertype names are matched during
/// resolution.
fn simple_type_name(node: Node, source: &str) -> String {
    match node.kind() {
        "type_identifier" => text(node, source).to_string(),
        "generic_type" | "array_type" => {
            let mut cursor = node.walk();
            let name = node.named_children(&mut cursor)
                .next()
                .map(|n| simple_type_name(n, source))
                .unwrap_or_default();
            name
        }
        "scoped_type_identifier" => {
            let mut cursor = node.walk();
            let name = node.named_children(&mut cursor)
                .last()
                .map(|n| simple_type_name(n, source))
                .unwrap_or_default();
            name
        }
        _ => {
            let raw = text(node, source);
            raw.split('<').next().unwrap_or(raw).trim().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: &str = r#"
package com.shop;

import com.shop.data.Repository;
import java.util.List;

public abstract class OrderService extends BaseService implements Auditable, Closeable {

    private Repository repo;
    private List<String> tags;
    private int count, limit;

    public OrderService(Repository repo) {
        this.repo = repo;
        init();
    }

    @Override
    public List<String> process(String id, int retries) {
        Order order = repo.fetch(id);
        transform(order);
        return tags;
    }

    private static void transform(Order order) {
        log.debug(order);
    }
}
"#;

    #[test]
    fn extracts_class_shape() {
        let classes = parse_source("OrderService.java", SERVICE).unwrap();
        assert_eq!(classes.len(), 1);
        let cls = &classes[0];

        assert_eq!(cls.name, "OrderService");
        assert_eq!(cls.qualified_name, "com.shop.OrderService");
        assert_eq!(cls.package_name, "com.shop");
        assert!(cls.is_abstract);
        assert!(!cls.is_interface);
        assert_eq!(cls.super_class.as_deref(), Some("BaseService"));
        assert_eq!(cls.interfaces, vec!["Auditable", "Closeable"]);
        assert_eq!(cls.imports, vec!["com.shop.data.Repository", "java.util.List"]);
        assert_eq!(cls.line_number, 7);
    }

    #[test]
    fn extracts_fields_with_multiple_declarators() {
        let classes = parse_source("OrderService.java", SERVICE).unwrap();
        assert_eq!(
            classes[0].fields,
            vec![
                "Repository repo",
                "List<String> tags",
                "int count",
                "int limit"
            ]
        );
    }

    #[test]
    fn extracts_methods_and_constructor() {
        let classes = parse_source("OrderService.java", SERVICE).unwrap();
        let cls = &classes[0];
        assert_eq!(cls.methods.len(), 3);

        let ctor = &cls.methods[0];
        assert!(ctor.is_constructor);
        assert_eq!(ctor.signature, "OrderService(Repository)");
        assert_eq!(ctor.access_modifier, "public");
        assert_eq!(ctor.method_calls, vec!["init"]);

        let process = &cls.methods[1];
        assert_eq!(process.signature, "process(String,int)");
        assert_eq!(process.return_type.as_deref(), Some("List<String>"));
        assert_eq!(process.annotations, vec!["Override"]);
        assert_eq!(process.method_calls, vec!["repo.fetch", "transform"]);

        let transform = &cls.methods[2];
        assert!(transform.is_static);
        assert_eq!(transform.access_modifier, "private");
        assert_eq!(transform.method_calls, vec!["log.debug"]);
    }

    #[test]
    fn extracts_interfaces_and_enums() {
        let source = r#"
package com.shop;

interface Auditable extends Closeable {
    void audit(String event);
}

enum Status implements Auditable {
    OPEN, CLOSED;

    public void audit(String event) {
        record(event);
    }
}
"#;
        let classes = parse_source("Types.java", source).unwrap();
        assert_eq!(classes.len(), 2);

        let iface = &classes[0];
        assert!(iface.is_interface);
        assert_eq!(iface.interfaces, vec!["Closeable"]);
        assert_eq!(iface.methods.len(), 1);
        assert!(iface.methods[0].method_calls.is_empty());

        let status = &classes[1];
        assert!(status.is_enum);
        assert_eq!(status.interfaces, vec!["Auditable"]);
        assert_eq!(status.methods.len(), 1);
        assert_eq!(status.methods[0].method_calls, vec!["record"]);
    }

    #[test]
    fn nested_types_get_their_own_records() {
        let source = r#"
package com.shop;

class Outer {
    void run() {}

    static class Inner {
        void helper() {}
    }
}
"#;
        let classes = parse_source("Outer.java", source).unwrap();
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Outer", "Inner"]);
        // The outer type only owns its direct members.
        assert_eq!(classes[0].methods.len(), 1);
        assert_eq!(classes[1].methods.len(), 1);
        assert_eq!(classes[1].qualified_name, "com.shop.Inner");
    }

    #[test]
    fn generic_supertype_names_are_simplified() {
        let source = r#"
package com.shop;

class Orders extends AbstractList<Order> implements Comparable<Orders> {
}
"#;
        let classes = parse_source("Orders.java", source).unwrap();
        assert_eq!(classes[0].super_class.as_deref(), Some("AbstractList"));
        assert_eq!(classes[0].interfaces, vec!["Comparable"]);
    }

    #[test]
    fn default_package_and_wildcard_import() {
        let source = r#"
import com.shop.util.*;

class Main {
    void main() {}
}
"#;
        let classes = parse_source("Main.java", source).unwrap();
        assert_eq!(classes[0].qualified_name, "Main");
        assert_eq!(classes[0].package_name, "");
        assert_eq!(classes[0].imports, vec!["com.shop.util"]);
    }
}
