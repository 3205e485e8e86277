//! Integration tests that verify generated Go is syntactically valid and
//! gofmt-clean.
//!
//! Skipped when `gofmt` is not installed.

use std::path::Path;

use mimic_codegen::testing::{GofmtChecker, SourceChecker, assert_generates_valid_code};
use mimic_codegen::{Destination, FileEntry, FileRegistry, generate_matchers, generate_mock_file};
use mimic_model::{ChanDir, InterfaceModel, Method, TypeRef};
use mimic_source::DEFAULT_RUNTIME;

fn write_generation(models: &[InterfaceModel], dir: &Path) -> eyre::Result<()> {
    let destination = Destination::new("store_test", DEFAULT_RUNTIME);
    let mut registry = FileRegistry::new();
    registry.register(FileEntry::mock(
        "mock_store_test.go",
        generate_mock_file(models, &destination).map_err(|e| eyre::eyre!("{}", e))?,
    ));
    for (file, content) in generate_matchers(models, DEFAULT_RUNTIME) {
        registry.register(FileEntry::matcher(Path::new("matchers").join(file), content));
    }
    registry
        .write_all(dir)
        .map_err(|e| eyre::eyre!("{}", e))?;
    Ok(())
}

fn store() -> InterfaceModel {
    InterfaceModel::new("Store", "example.com/store", "store")
        .method(
            Method::new("Put")
                .param("key", TypeRef::builtin("string"))
                .param("value", TypeRef::slice(TypeRef::builtin("byte")))
                .returns(TypeRef::builtin("error")),
        )
        .method(
            Method::new("Get")
                .param("ctx", TypeRef::named("context", "Context"))
                .param("key", TypeRef::builtin("string"))
                .returns(TypeRef::pointer(TypeRef::named("example.com/store", "Item")))
                .returns(TypeRef::builtin("bool")),
        )
        .method(
            Method::new("Log")
                .param("format", TypeRef::builtin("string"))
                .variadic("args", TypeRef::builtin("interface{}")),
        )
        .method(Method::new("Tags").variadic("tags", TypeRef::builtin("string")))
        .method(
            Method::new("Watch")
                .param(
                    "",
                    TypeRef::map(
                        TypeRef::builtin("string"),
                        TypeRef::Chan {
                            dir: ChanDir::Recv,
                            elem: Box::new(TypeRef::named("time", "Time")),
                        },
                    ),
                )
                .returns(TypeRef::Func {
                    params: vec![TypeRef::builtin("int")],
                    results: vec![TypeRef::builtin("error")],
                    variadic: false,
                }),
        )
        .method(Method::new("Close"))
}

#[test]
fn test_store_mock_is_gofmt_clean() {
    let checker = GofmtChecker;
    if !checker.is_available() {
        eprintln!("gofmt not found, skipping");
        return;
    }
    assert_generates_valid_code(|dir| write_generation(&[store()], dir), &checker)
        .expect("generated Go failed the gofmt check");
}
