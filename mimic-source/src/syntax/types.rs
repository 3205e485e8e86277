//! Type expressions as written in Go source.

use mimic_model::{ChanDir, TypeRef};
use tree_sitter::Node;

use super::{ImportTable, node_text};

/// Predeclared type names. A same-package type never shadows these here.
const PREDECLARED: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// A type as it appears in a file, before package qualifiers are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Unqualified name: predeclared or declared in the same package.
    Name(String),
    /// `pkg.Name`
    Qualified { qualifier: String, name: String },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array { len: String, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    Func {
        params: Vec<TypeExpr>,
        results: Vec<TypeExpr>,
        variadic: bool,
    },
    /// Anonymous struct or interface type.
    Literal(String),
    /// A type this tool cannot mock, kept for the error message.
    Unsupported { text: String, reason: String },
}

impl TypeExpr {
    /// Convert a type node.
    pub fn from_node(node: Node<'_>, source: &str) -> Self {
        match node.kind() {
            "type_identifier" | "identifier" => Self::Name(node_text(node, source).to_string()),
            "qualified_type" => {
                let qualifier = node
                    .child_by_field_name("package")
                    .map(|n| node_text(n, source).to_string())
                    .unwrap_or_default();
                let name = node
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string())
                    .unwrap_or_default();
                Self::Qualified { qualifier, name }
            }
            "pointer_type" => match first_named_child(node) {
                Some(elem) => Self::Pointer(Box::new(Self::from_node(elem, source))),
                None => unsupported(node, source, "pointer without element type"),
            },
            "slice_type" => match node.child_by_field_name("element") {
                Some(elem) => Self::Slice(Box::new(Self::from_node(elem, source))),
                None => unsupported(node, source, "slice without element type"),
            },
            "array_type" => {
                let len = node
                    .child_by_field_name("length")
                    .map(|n| node_text(n, source).to_string())
                    .unwrap_or_default();
                match node.child_by_field_name("element") {
                    Some(elem) => Self::Array {
                        len,
                        elem: Box::new(Self::from_node(elem, source)),
                    },
                    None => unsupported(node, source, "array without element type"),
                }
            }
            "map_type" => match (
                node.child_by_field_name("key"),
                node.child_by_field_name("value"),
            ) {
                (Some(key), Some(value)) => Self::Map {
                    key: Box::new(Self::from_node(key, source)),
                    value: Box::new(Self::from_node(value, source)),
                },
                _ => unsupported(node, source, "incomplete map type"),
            },
            "channel_type" => {
                let text = node_text(node, source);
                let dir = if text.starts_with("<-") {
                    ChanDir::Recv
                } else if text.starts_with("chan<-") || text.starts_with("chan <-") {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                match node.child_by_field_name("value") {
                    Some(elem) => Self::Chan {
                        dir,
                        elem: Box::new(Self::from_node(elem, source)),
                    },
                    None => unsupported(node, source, "channel without element type"),
                }
            }
            "function_type" => {
                let (params, variadic) = node
                    .child_by_field_name("parameters")
                    .map(|p| parameter_types(p, source))
                    .unwrap_or_default();
                let results = node
                    .child_by_field_name("result")
                    .map(|r| result_types(r, source))
                    .unwrap_or_default();
                Self::Func {
                    params,
                    results,
                    variadic,
                }
            }
            "parenthesized_type" => match first_named_child(node) {
                Some(inner) => Self::from_node(inner, source),
                None => unsupported(node, source, "empty parentheses"),
            },
            "interface_type" | "struct_type" => {
                Self::Literal(collapse_whitespace(node_text(node, source)))
            }
            "generic_type" => unsupported(node, source, "generic types are not supported"),
            other => unsupported(node, source, &format!("unexpected type syntax ({})", other)),
        }
    }

    /// Resolve qualifiers into import paths.
    ///
    /// Unqualified non-predeclared names belong to `package_path`.
    pub fn resolve(&self, package_path: &str, imports: &ImportTable) -> Result<TypeRef, String> {
        let resolve = |ty: &TypeExpr| ty.resolve(package_path, imports);
        Ok(match self {
            Self::Name(name) if PREDECLARED.contains(&name.as_str()) => TypeRef::builtin(name),
            Self::Name(name) => TypeRef::named(package_path, name),
            Self::Qualified { qualifier, name } => match imports.lookup(qualifier) {
                Some(path) => TypeRef::named(path, name),
                None => return Err(format!("unknown package qualifier '{}'", qualifier)),
            },
            Self::Pointer(elem) => TypeRef::pointer(resolve(elem)?),
            Self::Slice(elem) => TypeRef::slice(resolve(elem)?),
            Self::Array { len, elem } => TypeRef::Array {
                len: len.clone(),
                elem: Box::new(resolve(elem)?),
            },
            Self::Map { key, value } => TypeRef::map(resolve(key)?, resolve(value)?),
            Self::Chan { dir, elem } => TypeRef::Chan {
                dir: *dir,
                elem: Box::new(resolve(elem)?),
            },
            Self::Func {
                params,
                results,
                variadic,
            } => TypeRef::Func {
                params: params.iter().map(resolve).collect::<Result<_, _>>()?,
                results: results.iter().map(resolve).collect::<Result<_, _>>()?,
                variadic: *variadic,
            },
            Self::Literal(text) if is_empty_interface(text) => TypeRef::builtin("interface{}"),
            Self::Literal(text) => TypeRef::Literal { text: text.clone() },
            Self::Unsupported { text, reason } => return Err(format!("{}: {}", text, reason)),
        })
    }
}

fn unsupported(node: Node<'_>, source: &str, reason: &str) -> TypeExpr {
    TypeExpr::Unsupported {
        text: node_text(node, source).to_string(),
        reason: reason.to_string(),
    }
}

fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let child = node.named_children(&mut cursor).find(|c| c.kind() != "comment");
    child
}

/// Put a struct or interface literal on one line.
///
/// Line breaks that end a declaration become `; `, following Go's
/// semicolon insertion, so the entries stay separable.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            continue;
        }
        if let Some(last) = out.chars().last() {
            let ends_entry = last.is_alphanumeric() || matches!(last, '_' | ')' | ']' | '}' | '"' | '`');
            if ends_entry && !line.starts_with('}') {
                out.push(';');
            }
            out.push(' ');
        }
        out.push_str(&line);
    }
    out
}

fn is_empty_interface(text: &str) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).collect::<String>() == "interface{}"
}

/// One declared parameter, expanded per name (`a, b int` is two parameters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: Option<String>,
    pub ty: TypeExpr,
    pub is_variadic: bool,
}

/// Parameters of a `parameter_list` node, one entry per declared name.
pub fn parameter_decls(list: Node<'_>, source: &str) -> Vec<ParamDecl> {
    let mut params = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        let is_variadic = match decl.kind() {
            "parameter_declaration" => false,
            "variadic_parameter_declaration" => true,
            _ => continue,
        };
        let Some(type_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let ty = TypeExpr::from_node(type_node, source);

        let mut name_cursor = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| node_text(n, source).to_string())
            .collect();

        if names.is_empty() {
            params.push(ParamDecl {
                name: None,
                ty,
                is_variadic,
            });
        } else {
            for name in names {
                params.push(ParamDecl {
                    name: Some(name),
                    ty: ty.clone(),
                    is_variadic,
                });
            }
        }
    }
    params
}

/// Types of a result clause: either a single type or a parameter list.
pub fn result_types(node: Node<'_>, source: &str) -> Vec<TypeExpr> {
    if node.kind() == "parameter_list" {
        parameter_decls(node, source)
            .into_iter()
            .map(|p| p.ty)
            .collect()
    } else {
        vec![TypeExpr::from_node(node, source)]
    }
}

/// Parameter types of a function type; a trailing `...T` becomes `[]T`.
fn parameter_types(list: Node<'_>, source: &str) -> (Vec<TypeExpr>, bool) {
    let decls = parameter_decls(list, source);
    let variadic = decls.last().is_some_and(|p| p.is_variadic);
    let types = decls
        .into_iter()
        .map(|p| {
            if p.is_variadic {
                TypeExpr::Slice(Box::new(p.ty))
            } else {
                p.ty
            }
        })
        .collect();
    (types, variadic)
}
