//! Test utilities for the Go generator.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{path::Path, process::Command};

use eyre::{Result, eyre};

/// Error from checking generated sources.
#[derive(Debug)]
pub struct CheckError {
    pub message: String,
    pub output: String,
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n\nOutput:\n{}", self.message, self.output)
    }
}

impl std::error::Error for CheckError {}

/// Verifies generated Go sources in a directory.
pub trait SourceChecker {
    /// Whether the checker's tool is installed.
    fn is_available(&self) -> bool;

    /// Check every Go file under `dir`.
    fn check(&self, dir: &Path) -> Result<(), CheckError>;
}

/// Parses the sources with `gofmt -l -e` and requires them to be gofmt-clean.
///
/// Needs no module download, unlike `go build`, so it runs offline.
pub struct GofmtChecker;

impl SourceChecker for GofmtChecker {
    fn is_available(&self) -> bool {
        Command::new("gofmt")
            .arg("-h")
            .output()
            .map(|o| o.status.code().is_some())
            .unwrap_or(false)
    }

    fn check(&self, dir: &Path) -> Result<(), CheckError> {
        let output = Command::new("gofmt")
            .args(["-l", "-e", "."])
            .current_dir(dir)
            .output()
            .map_err(|e| CheckError {
                message: format!("Failed to run gofmt: {}", e),
                output: String::new(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(CheckError {
                message: "gofmt could not parse the generated sources".to_string(),
                output: stderr.into_owned(),
            });
        }
        if !stdout.trim().is_empty() {
            return Err(CheckError {
                message: "generated sources are not gofmt-formatted".to_string(),
                output: stdout.into_owned(),
            });
        }
        Ok(())
    }
}

/// Generate files into a temporary directory and return it.
///
/// The directory will be cleaned up when the returned `TempDir` is dropped.
pub fn generate_to_temp<F>(generate: F) -> Result<tempfile::TempDir>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let temp_dir = tempfile::TempDir::new()?;
    generate(temp_dir.path())?;
    Ok(temp_dir)
}

/// Run a generator and check its output.
pub fn assert_generates_valid_code<C>(
    generate: impl FnOnce(&Path) -> Result<()>,
    checker: &C,
) -> Result<()>
where
    C: SourceChecker,
{
    let temp_dir = generate_to_temp(generate)?;

    checker.check(temp_dir.path()).map_err(|e| {
        eprintln!("Generated files in {}:", temp_dir.path().display());
        if let Ok(entries) = std::fs::read_dir(temp_dir.path()) {
            for entry in entries.flatten() {
                eprintln!("  {}", entry.path().display());
            }
        }
        eyre!("Source check failed: {}", e)
    })?;

    Ok(())
}
