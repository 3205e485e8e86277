//! Import declarations and qualifier lookup.

use std::collections::BTreeMap;

/// One import spec of a Go file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    /// Explicit name (`foo "example.com/bar"`), including `_` and `.`.
    pub alias: Option<String>,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }

    /// Whether this is a dot import.
    pub fn is_dot(&self) -> bool {
        self.alias.as_deref() == Some(".")
    }
}

/// Guess the package name of an import path from its last segment.
///
/// `gopkg.in/yaml.v3` → `yaml`, `github.com/x/y/v2` → `y`,
/// `github.com/x/go-redis` → `redis`.
pub fn guess_package_name(import_path: &str) -> String {
    let mut segments: Vec<&str> = import_path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() > 1 && is_major_version(segments[segments.len() - 1]) {
        segments.pop();
    }
    let last = segments.last().copied().unwrap_or(import_path);

    let last = match last.rfind(".v") {
        Some(idx) if is_major_version(&last[idx + 1..]) => &last[..idx],
        _ => last,
    };
    let last = last.strip_prefix("go-").unwrap_or(last);
    let last = last.strip_suffix("-go").unwrap_or(last);
    let last = last.strip_suffix(".go").unwrap_or(last);

    last.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Maps the package qualifiers used in a file to import paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    by_name: BTreeMap<String, String>,
    unaliased: Vec<String>,
}

impl ImportTable {
    /// Build a table from a file's imports.
    ///
    /// `package_name_of` may supply the real package name of an unaliased
    /// import (read from its sources); otherwise the name is guessed.
    pub fn new(imports: &[Import], mut package_name_of: impl FnMut(&str) -> Option<String>) -> Self {
        let mut table = Self::default();
        for import in imports {
            match import.alias.as_deref() {
                Some("_") | Some(".") => {}
                Some(alias) => {
                    table.by_name.insert(alias.to_string(), import.path.clone());
                }
                None => {
                    let name = package_name_of(&import.path)
                        .unwrap_or_else(|| guess_package_name(&import.path));
                    table.by_name.insert(name, import.path.clone());
                    table.unaliased.push(import.path.clone());
                }
            }
        }
        table
    }

    /// Import path for a qualifier.
    ///
    /// Falls back to an unaliased import whose last segment contains the
    /// qualifier, which covers package names that differ from their directory.
    pub fn lookup(&self, qualifier: &str) -> Option<&str> {
        if let Some(path) = self.by_name.get(qualifier) {
            return Some(path);
        }
        self.unaliased
            .iter()
            .find(|path| {
                path.rsplit('/')
                    .next()
                    .is_some_and(|last| last.contains(qualifier))
            })
            .map(String::as_str)
    }
}
