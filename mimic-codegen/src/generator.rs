//! Mock file assembly.

use std::collections::BTreeSet;

use mimic_core::GENERATED_HEADER;
use mimic_model::InterfaceModel;
use mimic_source::{Error, Result};

use crate::builder::CodeBuilder;
use crate::mock::{MockRenderer, Qualifiers};
use crate::types::check_resolvable;
use crate::ImportSet;

/// Where and how a mock file is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Package clause of the mock file.
    pub package_name: String,
    /// Import path of the package the mock file belongs to, if it is one of
    /// the packages its types come from.
    pub self_package: Option<String>,
    /// Import path of the mocking runtime.
    pub runtime: String,
    /// Mock type name; only valid with a single interface.
    pub mock_name: Option<String>,
}

impl Destination {
    pub fn new(package_name: impl Into<String>, runtime: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            self_package: None,
            runtime: runtime.into(),
            mock_name: None,
        }
    }

    pub fn with_self_package(mut self, self_package: Option<String>) -> Self {
        self.self_package = self_package;
        self
    }

    pub fn with_mock_name(mut self, mock_name: Option<String>) -> Self {
        self.mock_name = mock_name;
        self
    }
}

/// `Mock` + interface name, unless overridden.
pub fn mock_name_for(model: &InterfaceModel, destination: &Destination) -> String {
    destination
        .mock_name
        .clone()
        .unwrap_or_else(|| format!("Mock{}", model.name))
}

/// Render one Go file holding mocks for every model.
pub fn generate_mock_file(models: &[InterfaceModel], destination: &Destination) -> Result<String> {
    if models.is_empty() {
        return Err(Error::invalid_arguments("no interfaces to mock"));
    }
    if destination.mock_name.is_some() && models.len() > 1 {
        return Err(Error::invalid_arguments(format!(
            "--mock-name can only be used with a single interface, got {}",
            models.len()
        )));
    }

    let self_package = destination.self_package.as_deref();
    let mut packages: BTreeSet<String> = BTreeSet::new();
    for model in models {
        for ty in model.types() {
            check_resolvable(ty, self_package, &model.package_path, &model.package_name)?;
            packages.extend(ty.packages());
        }
    }
    packages.extend([
        destination.runtime.clone(),
        "reflect".to_string(),
        "time".to_string(),
    ]);

    let imports = ImportSet::new(&packages, self_package);
    let qualifiers = Qualifiers::from_imports(&imports, &destination.runtime);

    let mut b = CodeBuilder::go();
    b.push_line(GENERATED_HEADER);
    for line in source_lines(models) {
        b.push_comment(&line);
    }
    b.push_blank();
    b.push_line(&format!("package {}", destination.package_name));
    b.push_blank();
    for line in imports.render().lines() {
        b.push_line(line);
    }

    for model in models {
        b.push_blank();
        MockRenderer::new(model, mock_name_for(model, destination), &imports, &qualifiers)
            .render(&mut b);
    }

    Ok(b.build())
}

/// `Source: <package> (interfaces: A, B)`, one line per package.
fn source_lines(models: &[InterfaceModel]) -> Vec<String> {
    let mut lines: Vec<(String, Vec<&str>)> = Vec::new();
    for model in models {
        match lines.iter_mut().find(|(p, _)| *p == model.package_path) {
            Some((_, names)) => names.push(&model.name),
            None => lines.push((model.package_path.clone(), vec![&model.name])),
        }
    }
    lines
        .into_iter()
        .map(|(package, names)| format!("Source: {} (interfaces: {})", package, names.join(", ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_model::{Method, TypeRef};

    const RUNTIME: &str = "github.com/petergtz/pegomock/v4";

    fn display() -> InterfaceModel {
        InterfaceModel::new("MyDisplay", "example.com/pegomocktest", "pegomocktest")
            .method(Method::new("Show").param("something", TypeRef::builtin("string")))
    }

    #[test]
    fn test_header_and_package_clause() {
        let code = generate_mock_file(&[display()], &Destination::new("pegomocktest_test", RUNTIME)).unwrap();
        assert!(code.starts_with(
            "// Code generated by mimic. DO NOT EDIT.\n// Source: example.com/pegomocktest (interfaces: MyDisplay)\n\npackage pegomocktest_test\n"
        ));
        assert!(code.contains("type MockMyDisplay struct {"));
        assert!(code.contains("func NewMockMyDisplay(options ...pegomock.Option) *MockMyDisplay {"));
    }

    #[test]
    fn test_mock_name_override() {
        let destination =
            Destination::new("pegomocktest_test", RUNTIME).with_mock_name(Some("FakeDisplay".into()));
        let code = generate_mock_file(&[display()], &destination).unwrap();
        assert!(code.contains("type FakeDisplay struct {"));
        assert!(!code.contains("MockMyDisplay"));
    }

    #[test]
    fn test_mock_name_needs_single_interface() {
        let other = InterfaceModel::new("Other", "example.com/pegomocktest", "pegomocktest");
        let destination =
            Destination::new("pegomocktest_test", RUNTIME).with_mock_name(Some("Fake".into()));
        let err = generate_mock_file(&[display(), other], &destination).unwrap_err();
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_self_package_types_are_unqualified() {
        let model = InterfaceModel::new("Store", "example.com/app", "app").method(
            Method::new("Get").returns(TypeRef::pointer(TypeRef::named("example.com/app", "item"))),
        );

        let outside = generate_mock_file(&[model.clone()], &Destination::new("app_test", RUNTIME));
        assert!(matches!(*outside.unwrap_err(), Error::UnresolvableType { .. }));

        let inside = Destination::new("app", RUNTIME).with_self_package(Some("example.com/app".into()));
        let code = generate_mock_file(&[model], &inside).unwrap();
        assert!(code.contains("func (mock *MockStore) Get() *item {"));
        assert!(!code.contains("\"example.com/app\""));
    }

    #[test]
    fn test_imports_are_aliased_by_qualifier() {
        // The directory need not match the declared package name.
        let model = InterfaceModel::new("Fetcher", "example.com/app", "app").method(
            Method::new("Fetch")
                .param("client", TypeRef::pointer(TypeRef::named("example.com/app/apiclient", "Client"))),
        );
        let code = generate_mock_file(&[model], &Destination::new("app_test", RUNTIME)).unwrap();
        assert!(code.contains("\tapiclient \"example.com/app/apiclient\"\n"));
        assert!(code.contains("Fetch(client *apiclient.Client) {"));
    }

    #[test]
    fn test_source_lines_group_by_package() {
        let a = InterfaceModel::new("A", "example.com/x", "x");
        let b = InterfaceModel::new("B", "example.com/x", "x");
        assert_eq!(
            source_lines(&[a, b]),
            vec!["Source: example.com/x (interfaces: A, B)".to_string()]
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let destination = Destination::new("pegomocktest_test", RUNTIME);
        let first = generate_mock_file(&[display()], &destination).unwrap();
        let second = generate_mock_file(&[display()], &destination).unwrap();
        assert_eq!(first, second);
    }
}
