//! Interface model.

use serde::{Deserialize, Serialize};

use crate::TypeRef;

/// Name given to a parameter whose declared name is unknown.
///
/// Reflection cannot see parameter names, and Go allows unnamed parameters
/// in interface declarations. The name depends only on the position, so
/// regenerating an unchanged interface yields the same code.
pub fn synthesized_param_name(index: usize) -> String {
    format!("_param{}", index)
}

/// One interface's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceModel {
    /// Interface name as declared (e.g. `Display`).
    pub name: String,
    /// Import path of the declaring package.
    pub package_path: String,
    /// Package name of the declaring package (the `package` clause).
    pub package_name: String,
    /// Methods in model order.
    pub methods: Vec<Method>,
}

impl InterfaceModel {
    pub fn new(
        name: impl Into<String>,
        package_path: impl Into<String>,
        package_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            package_path: package_path.into(),
            package_name: package_name.into(),
            methods: Vec::new(),
        }
    }

    /// Add a method (builder style).
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Every parameter and result type of every method, in model order.
    pub fn types(&self) -> impl Iterator<Item = &TypeRef> {
        self.methods.iter().flat_map(|m| {
            m.parameters
                .iter()
                .map(|p| &p.ty)
                .chain(m.results.iter().map(|r| &r.ty))
        })
    }
}

/// A method of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub results: Vec<ResultValue>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            ty,
            is_variadic: false,
        });
        self
    }

    /// Add a trailing `...ty` parameter.
    pub fn variadic(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            ty,
            is_variadic: true,
        });
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.results.push(ResultValue { ty });
        self
    }

    /// Returns true if the last parameter is variadic.
    pub fn is_variadic(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.is_variadic)
    }
}

/// A method parameter.
///
/// For a variadic parameter (`args ...string`) `ty` is the element type
/// (`string`), not the slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_variadic: bool,
}

impl Parameter {
    /// The type a call site sees: `[]T` for a variadic `...T`.
    pub fn effective_type(&self) -> TypeRef {
        if self.is_variadic {
            TypeRef::slice(self.ty.clone())
        } else {
            self.ty.clone()
        }
    }
}

/// A method result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultValue {
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_names_are_positional() {
        assert_eq!(synthesized_param_name(0), "_param0");
        assert_eq!(synthesized_param_name(3), "_param3");
    }

    #[test]
    fn test_method_builder_preserves_order() {
        let method = Method::new("Write")
            .param("key", TypeRef::builtin("string"))
            .param("value", TypeRef::builtin("int"))
            .variadic("tags", TypeRef::builtin("string"))
            .returns(TypeRef::builtin("int"))
            .returns(TypeRef::builtin("error"));

        let names: Vec<_> = method.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["key", "value", "tags"]);
        assert!(method.is_variadic());
        assert_eq!(method.results.len(), 2);
        assert_eq!(
            method.parameters[2].effective_type(),
            TypeRef::slice(TypeRef::builtin("string"))
        );
    }

    #[test]
    fn test_types_iterates_params_then_results() {
        let model = InterfaceModel::new("Store", "example.com/store", "store").method(
            Method::new("Get")
                .param("id", TypeRef::builtin("int"))
                .returns(TypeRef::named("example.com/store", "Item")),
        );

        let types: Vec<_> = model.types().cloned().collect();
        assert_eq!(
            types,
            vec![
                TypeRef::builtin("int"),
                TypeRef::named("example.com/store", "Item"),
            ]
        );
    }

    #[test]
    fn test_deserialize_reflected_method_without_names() {
        let json = r#"{
            "name": "Show",
            "parameters": [{"type": {"kind": "named", "package": null, "name": "string"}, "is_variadic": false}],
            "results": []
        }"#;
        let method: Method = serde_json::from_str(json).unwrap();
        assert_eq!(method.parameters[0].name, "");
        assert_eq!(method.parameters[0].ty, TypeRef::builtin("string"));
    }
}
