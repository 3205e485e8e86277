//! Invoking the `go` command.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::{Error, Result};

/// Handle on the `go` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoTool {
    command: String,
}

impl Default for GoTool {
    fn default() -> Self {
        Self::new("go")
    }
}

impl GoTool {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns true if `go version` runs successfully.
    pub fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// `go run .` inside `dir`.
    pub fn run_package(&self, dir: &Path) -> Result<Output> {
        tracing::debug!(dir = %dir.display(), "running go program");
        Command::new(&self.command)
            .args(["run", "."])
            .current_dir(dir)
            .output()
            .map_err(|e| {
                Error::toolchain(format!("could not start '{}': {}", self.command, e))
            })
    }

    /// GOROOT from the environment, falling back to `go env GOROOT`.
    pub fn goroot(&self) -> Option<PathBuf> {
        if let Some(root) = std::env::var_os("GOROOT").filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(root));
        }
        self.env("GOROOT")
    }

    /// GOPATH from the environment, falling back to `go env GOPATH`.
    pub fn gopath(&self) -> Option<PathBuf> {
        if let Some(path) = std::env::var_os("GOPATH").filter(|v| !v.is_empty()) {
            return std::env::split_paths(&path).next();
        }
        self.env("GOPATH")
    }

    fn env(&self, key: &str) -> Option<PathBuf> {
        let output = Command::new(&self.command)
            .args(["env", key])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(PathBuf::from(value))
        }
    }
}
