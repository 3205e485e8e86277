//! Package name detection for a directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Non-test `.go` files of a directory, sorted by name.
pub fn go_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(".go")
            && !name.ends_with("_test.go")
            && !name.starts_with('.')
            && !name.starts_with('_')
            && path.is_file()
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// The `package` clause of Go source, skipping comments.
pub fn package_clause(source: &str) -> Option<String> {
    let mut in_block_comment = false;
    for line in source.lines() {
        let mut line = line.trim();
        if in_block_comment {
            match line.find("*/") {
                Some(end) => {
                    in_block_comment = false;
                    line = line[end + 2..].trim();
                }
                None => continue,
            }
        }
        if line.starts_with("/*") {
            match line.find("*/") {
                Some(end) => line = line[end + 2..].trim(),
                None => {
                    in_block_comment = true;
                    continue;
                }
            }
        }
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let rest = line.strip_prefix("package")?;
        let name: String = rest
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        return (!name.is_empty()).then_some(name);
    }
    None
}

/// Package name declared by the non-test files of `dir`.
///
/// The most common name wins (ties go to the alphabetically first), which
/// skips stray `package main` tools and `// +build ignore` files.
pub fn declared_package_name(dir: &Path) -> Option<String> {
    let files = go_files(dir).ok()?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for file in files {
        let Ok(source) = std::fs::read_to_string(&file) else {
            continue;
        };
        if let Some(name) = package_clause(&source) {
            *counts.entry(name).or_default() += 1;
        }
    }
    let max = counts.values().copied().max()?;
    counts.into_iter().find(|(_, n)| *n == max).map(|(name, _)| name)
}

/// Package name of `dir`, falling back to its base name.
pub fn package_name_of_dir(dir: &Path) -> String {
    declared_package_name(dir).unwrap_or_else(|| fallback_package_name(dir))
}

fn fallback_package_name(dir: &Path) -> String {
    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("pkg{}", name)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_package_clause_skips_comments() {
        let source = "// Copyright\n/* block\n still */\n//go:build linux\n\npackage events // trailing\n";
        assert_eq!(package_clause(source).as_deref(), Some("events"));
        assert_eq!(package_clause("/* x */ package inline\n").as_deref(), Some("inline"));
        assert_eq!(package_clause("func main() {}\n"), None);
    }

    #[test]
    fn test_declared_package_name_majority() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.go"), "package pegomocktest\n").unwrap();
        fs::write(temp.path().join("b.go"), "package pegomocktest\n").unwrap();
        fs::write(temp.path().join("gen.go"), "package main\n").unwrap();
        fs::write(temp.path().join("a_test.go"), "package pegomocktest_test\n").unwrap();

        assert_eq!(
            declared_package_name(temp.path()).as_deref(),
            Some("pegomocktest")
        );
    }

    #[test]
    fn test_fallback_to_directory_name() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("my-pkg");
        fs::create_dir(&dir).unwrap();
        assert_eq!(package_name_of_dir(&dir), "my_pkg");
    }

    #[test]
    fn test_go_files_excludes_tests_and_hidden() {
        let temp = tempfile::tempdir().unwrap();
        for name in ["b.go", "a.go", "a_test.go", ".hidden.go", "_skip.go", "notes.txt"] {
            fs::write(temp.path().join(name), "package x\n").unwrap();
        }
        let names: Vec<_> = go_files(temp.path())
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.go", "b.go"]);
    }
}
