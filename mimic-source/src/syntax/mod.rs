//! Go source parsing with tree-sitter.

mod imports;
mod types;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tree_sitter::{Node, Parser, Tree};

use crate::{Error, Result, SourceContext};

pub use imports::{Import, ImportTable, guess_package_name};
pub use types::{ParamDecl, TypeExpr};

/// Go language parser using tree-sitter.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| Error::toolchain(format!("failed to load the Go grammar: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse Go source. `path` is used for diagnostics only.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<GoSource> {
        let ctx = SourceContext::new(source, path.display().to_string());
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ctx.syntax_error((0, 0)))?;

        if let Some(bad) = first_error(tree.root_node()) {
            let start = bad.start_byte();
            let len = (bad.end_byte() - start).max(1).min(source.len().saturating_sub(start));
            return Err(ctx.syntax_error((start, len)));
        }

        Ok(GoSource::from_tree(path, source, &tree))
    }

    /// Read and parse a Go file.
    pub fn parse_file(&mut self, path: &Path) -> Result<GoSource> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.parse(&source, path)
    }
}

pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(first_error)
        .or(Some(node))
}

/// The declarations of one Go file that matter for mocking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoSource {
    pub path: PathBuf,
    pub package_name: String,
    pub imports: Vec<Import>,
    /// Interface type declarations in source order.
    pub interfaces: Vec<InterfaceDecl>,
    /// Names of every other declared type.
    pub other_types: BTreeSet<String>,
}

/// `type Name interface { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: String,
    pub members: Vec<Member>,
    /// Set when the interface uses syntax that cannot be mocked.
    pub unsupported: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Method(MethodDecl),
    /// An embedded interface.
    Embedded(TypeExpr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub results: Vec<TypeExpr>,
}

impl GoSource {
    fn from_tree(path: &Path, source: &str, tree: &Tree) -> Self {
        let root = tree.root_node();
        let mut out = GoSource {
            path: path.to_path_buf(),
            package_name: String::new(),
            imports: Vec::new(),
            interfaces: Vec::new(),
            other_types: BTreeSet::new(),
        };

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_clause" => {
                    let mut pkg_cursor = child.walk();
                    if let Some(ident) = child
                        .named_children(&mut pkg_cursor)
                        .find(|n| n.kind() == "package_identifier")
                    {
                        out.package_name = node_text(ident, source).to_string();
                    }
                }
                "import_declaration" => collect_imports(child, source, &mut out.imports),
                "type_declaration" => out.collect_types(child, source),
                _ => {}
            }
        }

        out
    }

    fn collect_types(&mut self, decl: Node<'_>, source: &str) {
        let mut cursor = decl.walk();
        for spec in decl.named_children(&mut cursor) {
            if !matches!(spec.kind(), "type_spec" | "type_alias") {
                continue;
            }
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };
            let name = node_text(name, source).to_string();
            let ty = spec.child_by_field_name("type");

            match ty {
                Some(ty) if ty.kind() == "interface_type" => {
                    let mut iface = interface_decl(name, ty, source);
                    if spec.child_by_field_name("type_parameters").is_some() {
                        iface.unsupported = Some("generic interfaces are not supported".into());
                    }
                    self.interfaces.push(iface);
                }
                _ => {
                    self.other_types.insert(name);
                }
            }
        }
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Whether the file declares a type called `name`.
    pub fn declares_type(&self, name: &str) -> bool {
        self.other_types.contains(name) || self.interface(name).is_some()
    }
}

fn collect_imports(decl: Node<'_>, source: &str, imports: &mut Vec<Import>) {
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => imports.extend(import_spec(child, source)),
            "import_spec_list" => {
                let mut list_cursor = child.walk();
                for spec in child.named_children(&mut list_cursor) {
                    if spec.kind() == "import_spec" {
                        imports.extend(import_spec(spec, source));
                    }
                }
            }
            _ => {}
        }
    }
}

fn import_spec(spec: Node<'_>, source: &str) -> Option<Import> {
    let path = spec.child_by_field_name("path")?;
    let path = node_text(path, source).trim_matches(|c| c == '"' || c == '`');
    let alias = spec
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string());
    Some(Import {
        path: path.to_string(),
        alias,
    })
}

fn interface_decl(name: String, node: Node<'_>, source: &str) -> InterfaceDecl {
    let mut members = Vec::new();
    let mut unsupported = None;

    let mut cursor = node.walk();
    for member in node.named_children(&mut cursor) {
        match member.kind() {
            "method_elem" | "method_spec" => {
                let method_name = member
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string())
                    .unwrap_or_default();
                let params = member
                    .child_by_field_name("parameters")
                    .map(|p| types::parameter_decls(p, source))
                    .unwrap_or_default();
                let results = member
                    .child_by_field_name("result")
                    .map(|r| types::result_types(r, source))
                    .unwrap_or_default();
                members.push(Member::Method(MethodDecl {
                    name: method_name,
                    params,
                    results,
                }));
            }
            "type_elem" | "constraint_elem" => {
                let mut elem_cursor = member.walk();
                let terms: Vec<Node<'_>> = member.named_children(&mut elem_cursor).collect();
                match terms.as_slice() {
                    [single] => members.push(Member::Embedded(TypeExpr::from_node(*single, source))),
                    _ => {
                        unsupported = Some(format!(
                            "type constraint '{}' is not supported",
                            node_text(member, source)
                        ));
                    }
                }
            }
            "type_identifier" | "qualified_type" => {
                members.push(Member::Embedded(TypeExpr::from_node(member, source)));
            }
            "comment" => {}
            other => {
                unsupported = Some(format!("unexpected interface element ({})", other));
            }
        }
    }

    InterfaceDecl {
        name,
        members,
        unsupported,
    }
}
