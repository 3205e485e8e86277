use std::fmt::Write as _;
use std::path::Path;

use mimic_model::InterfaceModel;
use serde::Deserialize;

use crate::{Error, GoTool, Result};

/// Prefix of the temporary directory holding the reflection program.
pub const REFLECT_DIR_PREFIX: &str = "_mimic_reflect_";

/// Exit code the reflection program uses for a non-interface type.
const NOT_AN_INTERFACE_EXIT: i32 = 3;

/// Output of the reflection program.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ReflectedInterfaces(pub Vec<InterfaceModel>);

/// A Go program that describes interfaces of one package via `reflect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectProgram {
    package_path: String,
    interface_names: Vec<String>,
}

impl ReflectProgram {
    pub fn new(package_path: impl Into<String>, interface_names: &[String]) -> Self {
        Self {
            package_path: package_path.into(),
            interface_names: interface_names.to_vec(),
        }
    }

    /// The program source.
    pub fn source(&self) -> String {
        let mut out = String::from(PROGRAM_HEADER);
        let _ = writeln!(out, "\tsource_ {:?}", self.package_path);
        out.push_str(")\n\nvar targets = []target{\n");
        for name in &self.interface_names {
            let _ = writeln!(
                out,
                "\t{{{:?}, reflect.TypeOf((*source_.{})(nil)).Elem()}},",
                name, name
            );
        }
        out.push_str("}\n");
        out.push_str(PROGRAM_BODY);
        out
    }

    /// Build and run the program in a temporary directory under `working_dir`
    /// and decode its output.
    pub fn run(&self, working_dir: &Path, go: &GoTool) -> Result<Vec<InterfaceModel>> {
        let dir = tempfile::Builder::new()
            .prefix(REFLECT_DIR_PREFIX)
            .tempdir_in(working_dir)
            .map_err(|e| Error::io(working_dir, e))?;
        let main = dir.path().join("main.go");
        std::fs::write(&main, self.source()).map_err(|e| Error::io(&main, e))?;

        let output = go.run_package(dir.path())?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            tracing::debug!(stderr = %stderr, "reflection program failed");
            return Err(classify_failure(
                &self.package_path,
                &self.interface_names,
                output.status.code(),
                &stderr,
            ));
        }

        let decoded: ReflectedInterfaces = serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::toolchain(format!("unreadable reflection output: {}", e)))?;
        Ok(decoded.0)
    }
}

/// Map a failed reflection run to an error.
pub fn classify_failure(
    package: &str,
    names: &[String],
    exit_code: Option<i32>,
    stderr: &str,
) -> Box<Error> {
    let detail = Some(stderr.trim().to_string()).filter(|s| !s.is_empty());

    if exit_code == Some(NOT_AN_INTERFACE_EXIT) {
        let name = stderr
            .lines()
            .find_map(|l| l.trim().strip_prefix("mimic: not an interface: "))
            .unwrap_or_default();
        return Error::not_an_interface(name, package);
    }

    let package_missing = [
        "cannot find package",
        "no required module provides package",
        "is not in std",
        "is not in GOROOT",
        "malformed import path",
        "cannot find module providing package",
    ];
    if package_missing.iter().any(|needle| stderr.contains(needle)) {
        return Error::package_not_found(package, detail);
    }

    let offending = |needle: &str| {
        names
            .iter()
            .find(|name| {
                stderr.lines().any(|line| {
                    line.contains(needle) && line.contains(&format!("source_.{}", name))
                })
            })
            .cloned()
    };

    if let Some(name) = offending("is not a type") {
        return Error::not_an_interface(name, package);
    }
    for needle in ["undefined:", "not exported", "unexported"] {
        if let Some(name) = offending(needle) {
            return Error::interface_not_found(name, package, detail);
        }
    }

    Error::toolchain(detail.unwrap_or_else(|| "go run failed without output".to_string()))
}

const PROGRAM_HEADER: &str = r#"// Code generated by mimic. DO NOT EDIT.
// Temporary program used to describe interfaces via reflection.

package main

import (
	"encoding/json"
	"fmt"
	"os"
	"reflect"
	"strings"

"#;

const PROGRAM_BODY: &str = r#"
type target struct {
	name string
	typ  reflect.Type
}

type typeDesc map[string]interface{}

func describe(t reflect.Type) typeDesc {
	if t.Name() != "" {
		if t.PkgPath() == "" {
			return typeDesc{"kind": "named", "package": nil, "name": t.Name()}
		}
		return typeDesc{"kind": "named", "package": t.PkgPath(), "name": t.Name()}
	}
	switch t.Kind() {
	case reflect.Ptr:
		return typeDesc{"kind": "pointer", "elem": describe(t.Elem())}
	case reflect.Slice:
		return typeDesc{"kind": "slice", "elem": describe(t.Elem())}
	case reflect.Array:
		return typeDesc{"kind": "array", "len": fmt.Sprint(t.Len()), "elem": describe(t.Elem())}
	case reflect.Map:
		return typeDesc{"kind": "map", "key": describe(t.Key()), "value": describe(t.Elem())}
	case reflect.Chan:
		dir := "both"
		switch t.ChanDir() {
		case reflect.RecvDir:
			dir = "recv"
		case reflect.SendDir:
			dir = "send"
		}
		return typeDesc{"kind": "chan", "dir": dir, "elem": describe(t.Elem())}
	case reflect.Func:
		params := []typeDesc{}
		for i := 0; i < t.NumIn(); i++ {
			params = append(params, describe(t.In(i)))
		}
		results := []typeDesc{}
		for i := 0; i < t.NumOut(); i++ {
			results = append(results, describe(t.Out(i)))
		}
		return typeDesc{"kind": "func", "params": params, "results": results, "variadic": t.IsVariadic()}
	case reflect.Interface:
		if t.NumMethod() == 0 {
			return typeDesc{"kind": "named", "package": nil, "name": "interface{}"}
		}
	}
	return typeDesc{"kind": "literal", "text": t.String()}
}

type paramDesc struct {
	Type       typeDesc `json:"type"`
	IsVariadic bool     `json:"is_variadic"`
}

type resultDesc struct {
	Type typeDesc `json:"type"`
}

type methodDesc struct {
	Name       string       `json:"name"`
	Parameters []paramDesc  `json:"parameters"`
	Results    []resultDesc `json:"results"`
}

type interfaceDesc struct {
	Name        string       `json:"name"`
	PackagePath string       `json:"package_path"`
	PackageName string       `json:"package_name"`
	Methods     []methodDesc `json:"methods"`
}

func main() {
	out := []interfaceDesc{}
	for _, target := range targets {
		t := target.typ
		if t.Kind() != reflect.Interface {
			fmt.Fprintf(os.Stderr, "mimic: not an interface: %s\n", target.name)
			os.Exit(3)
		}
		desc := interfaceDesc{
			Name:        target.name,
			PackagePath: t.PkgPath(),
			PackageName: strings.SplitN(t.String(), ".", 2)[0],
			Methods:     []methodDesc{},
		}
		for i := 0; i < t.NumMethod(); i++ {
			m := t.Method(i)
			if m.PkgPath != "" {
				continue
			}
			method := methodDesc{Name: m.Name, Parameters: []paramDesc{}, Results: []resultDesc{}}
			for j := 0; j < m.Type.NumIn(); j++ {
				in := m.Type.In(j)
				variadic := m.Type.IsVariadic() && j == m.Type.NumIn()-1
				if variadic {
					in = in.Elem()
				}
				method.Parameters = append(method.Parameters, paramDesc{Type: describe(in), IsVariadic: variadic})
			}
			for j := 0; j < m.Type.NumOut(); j++ {
				method.Results = append(method.Results, resultDesc{Type: describe(m.Type.Out(j))})
			}
			desc.Methods = append(desc.Methods, method)
		}
		out = append(out, desc)
	}
	if err := json.NewEncoder(os.Stdout).Encode(out); err != nil {
		fmt.Fprintln(os.Stderr, err)
		os.Exit(1)
	}
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_model::TypeRef;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_program_source_imports_target() {
        let program = ReflectProgram::new("example.com/pegomocktest", &names(&["MyDisplay", "Writer"]));
        let source = program.source();
        assert!(source.contains("\tsource_ \"example.com/pegomocktest\"\n)"));
        assert!(source.contains(
            "{\"MyDisplay\", reflect.TypeOf((*source_.MyDisplay)(nil)).Elem()},"
        ));
        assert!(source.contains("{\"Writer\", reflect.TypeOf((*source_.Writer)(nil)).Elem()},"));
        assert!(source.contains("func main()"));
    }

    #[test]
    fn test_decode_output() {
        let stdout = r#"[{"name":"MyDisplay","package_path":"example.com/pegomocktest","package_name":"pegomocktest","methods":[
            {"name":"Show","parameters":[{"type":{"kind":"named","package":null,"name":"string"},"is_variadic":false}],"results":[]},
            {"name":"Log","parameters":[{"type":{"kind":"named","package":null,"name":"interface{}"},"is_variadic":true}],"results":[{"type":{"kind":"named","package":null,"name":"error"}}]}
        ]}]"#;
        let decoded: ReflectedInterfaces = serde_json::from_str(stdout).unwrap();
        let model = &decoded.0[0];
        assert_eq!(model.package_name, "pegomocktest");
        assert_eq!(model.methods[0].parameters[0].ty, TypeRef::builtin("string"));
        assert!(model.methods[1].is_variadic());
        assert!(model.methods[1].results[0].ty.is_error());
    }

    #[test]
    fn test_classify_package_not_found() {
        let stderr = "main.go:12:2: no required module provides package example.com/missing; to add it:\n";
        let err = classify_failure("example.com/missing", &names(&["X"]), Some(1), stderr);
        assert!(matches!(*err, Error::PackageNotFound { .. }));
    }

    #[test]
    fn test_classify_interface_not_found() {
        let stderr = "# command-line-arguments\n./main.go:18:28: undefined: source_.Missing\n";
        let err = classify_failure("example.com/pkg", &names(&["Display", "Missing"]), Some(1), stderr);
        match *err {
            Error::InterfaceNotFound { ref name, .. } => assert_eq!(name, "Missing"),
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_classify_not_a_type() {
        let stderr = "./main.go:18:28: source_.NewThing is not a type\n";
        let err = classify_failure("example.com/pkg", &names(&["NewThing"]), Some(1), stderr);
        assert!(matches!(*err, Error::NotAnInterfaceType { ref name, .. } if name == "NewThing"));
    }

    #[test]
    fn test_classify_struct_kind() {
        let stderr = "mimic: not an interface: Config\nexit status 3\n";
        let err = classify_failure("example.com/pkg", &names(&["Config"]), Some(3), stderr);
        assert!(matches!(*err, Error::NotAnInterfaceType { ref name, .. } if name == "Config"));
    }

    #[test]
    fn test_classify_other_failure() {
        let err = classify_failure("example.com/pkg", &names(&["X"]), Some(2), "go: out of disk\n");
        assert!(matches!(*err, Error::Toolchain { ref message } if message == "go: out of disk"));
    }

    #[test]
    fn test_reflection_end_to_end() {
        let go = GoTool::default();
        if !go.is_available() {
            return;
        }
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("go.mod"), "module example.com/pegomocktest\n\ngo 1.18\n").unwrap();
        std::fs::write(
            temp.path().join("display.go"),
            "package pegomocktest\n\ntype MyDisplay interface {\n\tShow(something string)\n}\n",
        )
        .unwrap();

        let program = ReflectProgram::new("example.com/pegomocktest", &names(&["MyDisplay"]));
        let models = program.run(temp.path(), &go).unwrap();
        assert_eq!(models[0].methods[0].name, "Show");
        assert_eq!(models[0].methods[0].parameters[0].ty, TypeRef::builtin("string"));

        // The temporary program is cleaned up.
        let leftovers = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(REFLECT_DIR_PREFIX))
            .count();
        assert_eq!(leftovers, 0);
    }
}
