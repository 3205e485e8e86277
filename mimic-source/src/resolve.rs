//! Source argument resolution.
//!
//! Turns the positional arguments of `generate` into a [`SourceSpec`].

use std::path::PathBuf;

use mimic_core::is_go_identifier;
use mimic_model::SourceSpec;

use crate::{Error, Result};

/// Resolve 1–2 positional tokens into a source spec.
///
/// - `display.go` → [`SourceSpec::GoFile`]
/// - `Display` or `Display,Writer` → [`SourceSpec::BareInterfaceNames`]
/// - `example.com/pkg Display[,Writer]` → [`SourceSpec::PackageAndInterfaces`]
pub fn resolve_args<S: AsRef<str>>(args: &[S]) -> Result<SourceSpec> {
    match args {
        [] => Err(Error::invalid_arguments(
            "expected a Go file or interface names, got no arguments",
        )),
        [single] => {
            let single = single.as_ref();
            if is_go_file(single) {
                Ok(SourceSpec::GoFile {
                    path: PathBuf::from(single),
                })
            } else {
                Ok(SourceSpec::BareInterfaceNames {
                    names: split_interface_names(single)?,
                })
            }
        }
        [package, interfaces] => {
            let package = package.as_ref();
            if !looks_like_package_path(package) {
                return Err(Error::invalid_arguments(format!(
                    "'{}' does not look like a package path; with two arguments the first must be an import path such as 'example.com/project/pkg'",
                    package
                )));
            }
            Ok(SourceSpec::PackageAndInterfaces {
                package_path: package.to_string(),
                interface_names: split_interface_names(interfaces.as_ref())?,
            })
        }
        more => Err(Error::invalid_arguments(format!(
            "expected at most 2 arguments, got {}",
            more.len()
        ))),
    }
}

fn is_go_file(token: &str) -> bool {
    token.ends_with(".go") && token.len() > ".go".len()
}

/// Heuristic for importable package paths.
///
/// Accepts `io`, `net/http`, `github.com/x/y/v2`, `.`, `./sub` and `../sibling`.
/// Rejects a single segment starting with an upper-case letter, which is the
/// shape of an interface name.
pub fn looks_like_package_path(token: &str) -> bool {
    if token.is_empty() || is_go_file(token) {
        return false;
    }

    let segments: Vec<&str> = token.split('/').collect();
    let well_formed = segments.iter().all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '~' | '-'))
    });
    if !well_formed {
        return false;
    }

    let single_capitalized = segments.len() == 1
        && token.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    !single_capitalized
}

/// Whether a package argument is relative to the working directory.
pub fn is_relative_package(package: &str) -> bool {
    package == "." || package == ".." || package.starts_with("./") || package.starts_with("../")
}

fn split_interface_names(token: &str) -> Result<Vec<String>> {
    let names: Vec<String> = token.split(',').map(|n| n.trim().to_string()).collect();

    for name in &names {
        if name.is_empty() {
            return Err(Error::invalid_arguments(format!(
                "empty interface name in '{}'",
                token
            )));
        }
        if !is_go_identifier(name) {
            return Err(Error::invalid_arguments(format!(
                "'{}' is not a valid interface name",
                name
            )));
        }
    }

    Ok(names)
}
