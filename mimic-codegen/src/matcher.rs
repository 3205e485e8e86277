//! Argument matcher helpers.
//!
//! One file per non-primitive type in the `matchers` package, with `Any`,
//! `Eq`, `NotEq` and `That` helpers that register a matcher with the
//! runtime and return the zero value of the type.

use std::collections::BTreeMap;

use mimic_core::{GENERATED_HEADER, to_snake_case};
use mimic_model::{InterfaceModel, TypeRef};

use crate::builder::CodeBuilder;
use crate::mock::Qualifiers;
use crate::types::{check_resolvable, matcher_name, reflect_type_of, render_type};
use crate::ImportSet;

/// Package clause of every matcher file.
pub const MATCHERS_PACKAGE: &str = "matchers";

/// Matcher sources keyed by file name (`ptr_to_http_request.go`).
pub fn generate_matchers(models: &[InterfaceModel], runtime: &str) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    for model in models {
        for ty in model.types() {
            if ty.is_primitive() {
                continue;
            }
            let name = matcher_name(ty);
            let file_name = format!("{}.go", to_snake_case(&name));
            if files.contains_key(&file_name) {
                continue;
            }
            if let Err(err) = check_resolvable(ty, None, &model.package_path, &model.package_name) {
                tracing::warn!(matcher = %name, "skipping matcher: {}", err);
                continue;
            }
            files.insert(file_name, render_matcher_file(ty, &name, runtime));
        }
    }
    files
}

fn render_matcher_file(ty: &TypeRef, name: &str, runtime: &str) -> String {
    let mut packages: Vec<String> = ty.packages().into_iter().collect();
    packages.extend([runtime.to_string(), "reflect".to_string()]);
    let imports = ImportSet::new(packages, None);
    let q = Qualifiers::from_imports(&imports, runtime);
    let rt = &q.runtime;
    let go_type = render_type(ty, &imports);

    let mut b = CodeBuilder::go();
    b.push_line(GENERATED_HEADER);
    b.push_blank();
    b.push_line(&format!("package {}", MATCHERS_PACKAGE));
    b.push_blank();
    for line in imports.render().lines() {
        b.push_line(line);
    }
    b.push_blank();

    b.push_line(&format!("func Any{}() {} {{", name, go_type));
    b.push_indent();
    b.push_line(&format!(
        "{}.RegisterMatcher({}.NewAnyMatcher({}))",
        rt,
        rt,
        reflect_type_of(&q.reflect, &go_type)
    ));
    push_null_return(&mut b, &go_type);
    b.push_dedent();
    b.push_line("}");
    b.push_blank();

    for (prefix, matcher) in [("Eq", "EqMatcher"), ("NotEq", "NotEqMatcher")] {
        b.push_line(&format!(
            "func {}{}(value {}) {} {{",
            prefix, name, go_type, go_type
        ));
        b.push_indent();
        b.push_line(&format!(
            "{}.RegisterMatcher(&{}.{}{{Value: value}})",
            rt, rt, matcher
        ));
        push_null_return(&mut b, &go_type);
        b.push_dedent();
        b.push_line("}");
        b.push_blank();
    }

    b.push_line(&format!(
        "func {}That(matcher {}.ArgumentMatcher) {} {{",
        name, rt, go_type
    ));
    b.push_indent();
    b.push_line(&format!("{}.RegisterMatcher(matcher)", rt));
    push_null_return(&mut b, &go_type);
    b.push_dedent();
    b.push_line("}");

    b.build()
}

fn push_null_return(b: &mut CodeBuilder, go_type: &str) {
    b.push_line(&format!("var nullValue {}", go_type));
    b.push_line("return nullValue");
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_model::Method;

    const RUNTIME: &str = "github.com/petergtz/pegomock/v4";

    #[test]
    fn test_one_file_per_non_primitive_type() {
        let model = InterfaceModel::new("Client", "example.com/client", "client")
            .method(
                Method::new("Do")
                    .param("req", TypeRef::pointer(TypeRef::named("net/http", "Request")))
                    .param("retries", TypeRef::builtin("int"))
                    .returns(TypeRef::builtin("error")),
            )
            .method(
                Method::new("Again")
                    .param("req", TypeRef::pointer(TypeRef::named("net/http", "Request"))),
            );
        let files = generate_matchers(&[model], RUNTIME);
        let names: Vec<_> = files.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["error.go", "ptr_to_http_request.go"]);
    }

    #[test]
    fn test_matcher_file_contents() {
        let model = InterfaceModel::new("Client", "example.com/client", "client").method(
            Method::new("Do").param("req", TypeRef::pointer(TypeRef::named("net/http", "Request"))),
        );
        let files = generate_matchers(&[model], RUNTIME);
        let source = &files["ptr_to_http_request.go"];

        assert!(source.starts_with("// Code generated by mimic. DO NOT EDIT.\n\npackage matchers\n"));
        assert!(source.contains("\thttp \"net/http\"\n\treflect \"reflect\"\n\n\tpegomock \"github.com/petergtz/pegomock/v4\"\n"));
        assert!(source.contains("func AnyPtrToHttpRequest() *http.Request {"));
        assert!(source.contains("pegomock.NewAnyMatcher(reflect.TypeOf((**http.Request)(nil)).Elem())"));
        assert!(source.contains("func EqPtrToHttpRequest(value *http.Request) *http.Request {"));
        assert!(source.contains("pegomock.RegisterMatcher(&pegomock.NotEqMatcher{Value: value})"));
        assert!(source.contains("func PtrToHttpRequestThat(matcher pegomock.ArgumentMatcher) *http.Request {"));
    }

    #[test]
    fn test_unresolvable_types_are_skipped() {
        let model = InterfaceModel::new("Store", "example.com/store", "store").method(
            Method::new("Put")
                .param("s", TypeRef::named("example.com/store", "settings"))
                .param("t", TypeRef::named("time", "Time")),
        );
        let files = generate_matchers(&[model], RUNTIME);
        assert_eq!(files.len(), 1);
        assert!(files.contains_key("time_time.go"));
    }
}
