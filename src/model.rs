//! Declaration model — the immutable records the parser hands to the
//! graph builder.
//!
//! One `ClassInfo` per declared type (class, interface, or enum), each
//! carrying its member declarations. These are plain data: the builder
//! never mutates them, and a fresh analysis run replaces them wholesale.

use serde::{Deserialize, Serialize};

/// A parsed class, interface, or enum declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Simple name, e.g. `OrderService`.
    pub name: String,
    /// Package-qualified name, e.g. `com.shop.OrderService`.
    pub qualified_name: String,
    /// Declaring package ("" for the default package).
    pub package_name: String,
    /// Source file this declaration came from.
    pub file_path: String,
    /// 1-based line of the declaration.
    pub line_number: u32,
    pub is_interface: bool,
    pub is_enum: bool,
    pub is_abstract: bool,
    /// Simple name of the extended type, if any.
    pub super_class: Option<String>,
    /// Simple names of implemented (or, for interfaces, extended) interfaces.
    pub interfaces: Vec<String>,
    pub methods: Vec<MethodInfo>,
    /// Field descriptors as `"Type name"` strings; the leading token is the
    /// field's declared type.
    pub fields: Vec<String>,
    pub annotations: Vec<String>,
    /// Fully qualified imports recorded in the declaring file.
    pub imports: Vec<String>,
}

impl ClassInfo {
    /// Create a declaration with the required identity fields. A name is
    /// mandatory; the qualified name is derived from the package when the
    /// caller has not set one explicitly.
    pub fn new(name: impl Into<String>, package_name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "class declaration requires a name");
        let package_name = package_name.into();
        let qualified_name = if package_name.is_empty() {
            name.clone()
        } else {
            format!("{package_name}.{name}")
        };
        Self {
            name,
            qualified_name,
            package_name,
            file_path: String::new(),
            line_number: 0,
            is_interface: false,
            is_enum: false,
            is_abstract: false,
            super_class: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            annotations: Vec::new(),
            imports: Vec::new(),
        }
    }
}

/// A parsed method or constructor declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    /// `name(paramType,paramType)` — stable identity for the member.
    pub signature: String,
    /// Qualified name of the declaring type.
    pub class_name: String,
    pub return_type: Option<String>,
    pub parameter_types: Vec<String>,
    /// Raw call-target strings recorded by the parser: `scope.name` for
    /// scoped calls, bare `name` otherwise. Resolution happens in the
    /// graph builder.
    pub method_calls: Vec<String>,
    pub annotations: Vec<String>,
    pub line_number: u32,
    pub is_constructor: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    /// `public`, `protected`, `private`, or `package-private`.
    pub access_modifier: String,
}

impl MethodInfo {
    /// Create a member declaration. The signature is derived from the name
    /// and parameter types, guaranteeing a stable identity even when two
    /// overloads share a name.
    pub fn new(
        name: impl Into<String>,
        class_name: impl Into<String>,
        parameter_types: Vec<String>,
    ) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "member declaration requires a name");
        let signature = derive_signature(&name, &parameter_types);
        Self {
            name,
            signature,
            class_name: class_name.into(),
            return_type: None,
            parameter_types,
            method_calls: Vec::new(),
            annotations: Vec::new(),
            line_number: 0,
            is_constructor: false,
            is_static: false,
            is_abstract: false,
            access_modifier: "package-private".to_string(),
        }
    }

    /// Qualified member name: `<class>.<signature>`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.signature)
    }
}

/// Deterministic signature derivation: `name(paramType,paramType)`.
pub fn derive_signature(name: &str, parameter_types: &[String]) -> String {
    format!("{}({})", name, parameter_types.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_derived_from_package() {
        let cls = ClassInfo::new("OrderService", "com.shop");
        assert_eq!(cls.qualified_name, "com.shop.OrderService");

        let bare = ClassInfo::new("Main", "");
        assert_eq!(bare.qualified_name, "Main");
    }

    #[test]
    fn signature_is_stable_for_overloads() {
        let a = MethodInfo::new("save", "com.shop.Repo", vec!["Order".into()]);
        let b = MethodInfo::new("save", "com.shop.Repo", vec!["Order".into(), "boolean".into()]);
        assert_eq!(a.signature, "save(Order)");
        assert_eq!(b.signature, "save(Order,boolean)");
        assert_ne!(a.qualified_name(), b.qualified_name());
    }

    #[test]
    #[should_panic(expected = "requires a name")]
    fn empty_class_name_fails_fast() {
        ClassInfo::new("", "com.shop");
    }
}
