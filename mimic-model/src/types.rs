//! Go type references.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Predeclared Go types that never get a generated matcher.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
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

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `<-chan T`
    Recv,
    /// `chan<- T`
    Send,
}

/// A Go type, with every named type carrying its full import path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// A named type. `package` is `None` for predeclared types
    /// (`string`, `error`, `interface{}`).
    Named {
        package: Option<String>,
        name: String,
    },
    Pointer {
        elem: Box<TypeRef>,
    },
    Slice {
        elem: Box<TypeRef>,
    },
    Array {
        len: String,
        elem: Box<TypeRef>,
    },
    Map {
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeRef>,
    },
    /// A function type. When `variadic` is set the last parameter is a slice
    /// and is rendered as `...elem`.
    Func {
        params: Vec<TypeRef>,
        results: Vec<TypeRef>,
        variadic: bool,
    },
    /// An anonymous struct or interface type, kept as written.
    Literal {
        text: String,
    },
}

impl TypeRef {
    /// A predeclared type such as `string` or `error`.
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::Named {
            package: None,
            name: name.into(),
        }
    }

    /// A named type declared in `package`.
    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            package: Some(package.into()),
            name: name.into(),
        }
    }

    pub fn pointer(elem: TypeRef) -> Self {
        Self::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeRef) -> Self {
        Self::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Returns true for the predeclared numeric, boolean and string types.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Named { package: None, name } if PRIMITIVE_TYPES.contains(&name.as_str()))
    }

    /// Returns true for `error`.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Named { package: None, name } if name == "error")
    }

    /// Collect the import paths of every package this type mentions.
    pub fn packages(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_packages(&mut out);
        out
    }

    fn collect_packages(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Named {
                package: Some(package),
                ..
            } => {
                out.insert(package.clone());
            }
            Self::Named { package: None, .. } | Self::Literal { .. } => {}
            Self::Pointer { elem }
            | Self::Slice { elem }
            | Self::Array { elem, .. }
            | Self::Chan { elem, .. } => elem.collect_packages(out),
            Self::Map { key, value } => {
                key.collect_packages(out);
                value.collect_packages(out);
            }
            Self::Func {
                params, results, ..
            } => {
                for ty in params.iter().chain(results) {
                    ty.collect_packages(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_primitive() {
        assert!(TypeRef::builtin("string").is_primitive());
        assert!(TypeRef::builtin("uintptr").is_primitive());
        assert!(!TypeRef::builtin("error").is_primitive());
        assert!(!TypeRef::named("net/http", "Request").is_primitive());
        assert!(!TypeRef::slice(TypeRef::builtin("string")).is_primitive());
    }

    #[test]
    fn test_packages_walks_nested_types() {
        let ty = TypeRef::map(
            TypeRef::named("example.com/a", "Key"),
            TypeRef::Func {
                params: vec![TypeRef::pointer(TypeRef::named("net/http", "Request"))],
                results: vec![TypeRef::builtin("error")],
                variadic: false,
            },
        );

        let packages: Vec<_> = ty.packages().into_iter().collect();
        assert_eq!(packages, vec!["example.com/a", "net/http"]);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"kind":"pointer","elem":{"kind":"named","package":null,"name":"string"}}"#;
        let ty: TypeRef = serde_json::from_str(json).unwrap();
        assert_eq!(ty, TypeRef::pointer(TypeRef::builtin("string")));

        let chan = r#"{"kind":"chan","dir":"recv","elem":{"kind":"named","package":"time","name":"Time"}}"#;
        let ty: TypeRef = serde_json::from_str(chan).unwrap();
        assert_eq!(
            ty,
            TypeRef::Chan {
                dir: ChanDir::Recv,
                elem: Box::new(TypeRef::named("time", "Time")),
            }
        );
    }
}
