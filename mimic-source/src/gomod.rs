//! Go module discovery and import path to directory mapping.

use std::path::{Component, Path, PathBuf};

use crate::resolve::is_relative_package;
use crate::{Error, GoTool, Result};

/// A module rooted at a `go.mod` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    root: PathBuf,
    path: String,
}

impl GoModule {
    pub fn new(root: impl Into<PathBuf>, path: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            path: path.into(),
        }
    }

    /// Find the module containing `dir` by walking up to the nearest `go.mod`.
    pub fn find(dir: &Path) -> Result<Option<Self>> {
        for candidate in dir.ancestors() {
            let go_mod = candidate.join("go.mod");
            if !go_mod.is_file() {
                continue;
            }
            let content = std::fs::read_to_string(&go_mod).map_err(|e| Error::io(&go_mod, e))?;
            return match parse_module_path(&content) {
                Some(path) => Ok(Some(Self::new(candidate, path))),
                None => Err(Error::toolchain(format!(
                    "{} has no module directive",
                    go_mod.display()
                ))),
            };
        }
        Ok(None)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The module path declared in go.mod.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Import path of a directory inside the module.
    pub fn import_path_of(&self, dir: &Path) -> Option<String> {
        let relative = dir.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            Some(self.path.clone())
        } else {
            Some(format!("{}/{}", self.path, segments.join("/")))
        }
    }

    /// Directory of an import path inside the module, or in its `vendor/`.
    pub fn dir_of(&self, import_path: &str) -> Option<PathBuf> {
        if import_path == self.path {
            return Some(self.root.clone());
        }
        if let Some(rest) = import_path
            .strip_prefix(&self.path)
            .and_then(|r| r.strip_prefix('/'))
        {
            let dir = self.root.join(rest);
            if dir.is_dir() {
                return Some(dir);
            }
        }
        let vendored = self.root.join("vendor").join(import_path);
        vendored.is_dir().then_some(vendored)
    }
}

/// Extract the module path from go.mod content.
pub fn parse_module_path(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

/// Maps import paths to directories and directories to import paths.
#[derive(Debug, Clone, Default)]
pub struct PackageLocator {
    working_dir: PathBuf,
    module: Option<GoModule>,
    goroot: Option<PathBuf>,
    gopath: Option<PathBuf>,
}

impl PackageLocator {
    pub fn new(working_dir: impl Into<PathBuf>, module: Option<GoModule>) -> Self {
        Self {
            working_dir: working_dir.into(),
            module,
            goroot: None,
            gopath: None,
        }
    }

    pub fn with_goroot(mut self, goroot: Option<PathBuf>) -> Self {
        self.goroot = goroot;
        self
    }

    pub fn with_gopath(mut self, gopath: Option<PathBuf>) -> Self {
        self.gopath = gopath;
        self
    }

    /// Locator for `working_dir`, asking the toolchain for GOROOT and GOPATH.
    pub fn discover(working_dir: &Path, go: &GoTool) -> Result<Self> {
        let module = GoModule::find(working_dir)?;
        tracing::debug!(
            module = module.as_ref().map(GoModule::path).unwrap_or("<none>"),
            "located go module"
        );
        Ok(Self::new(working_dir, module)
            .with_goroot(go.goroot())
            .with_gopath(go.gopath()))
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn module(&self) -> Option<&GoModule> {
        self.module.as_ref()
    }

    /// Directory holding the sources of `package`.
    pub fn locate(&self, package: &str) -> Option<PathBuf> {
        if is_relative_package(package) {
            let dir = self.working_dir.join(package);
            return dir.is_dir().then_some(dir);
        }
        if let Some(dir) = self.module.as_ref().and_then(|m| m.dir_of(package)) {
            return Some(dir);
        }
        let in_root = |root: &Option<PathBuf>| {
            root.as_ref()
                .map(|r| r.join("src").join(package))
                .filter(|d| d.is_dir())
        };
        in_root(&self.goroot).or_else(|| in_root(&self.gopath))
    }

    /// Import path of a local directory, if it is inside the module or GOPATH.
    pub fn import_path_of(&self, dir: &Path) -> Option<String> {
        if let Some(path) = self.module.as_ref().and_then(|m| m.import_path_of(dir)) {
            return Some(path);
        }
        let src = self.gopath.as_ref()?.join("src");
        let relative = dir.strip_prefix(src).ok()?;
        let path = relative.to_string_lossy().replace('\\', "/");
        (!path.is_empty()).then_some(path)
    }

    /// Canonical import path for a package argument.
    ///
    /// Relative arguments are resolved against the working directory.
    pub fn canonical_import_path(&self, package: &str) -> Result<String> {
        if !is_relative_package(package) {
            return Ok(package.to_string());
        }
        let dir = normalize(&self.working_dir.join(package));
        self.import_path_of(&dir).ok_or_else(|| {
            Error::package_not_found(
                package,
                Some(format!(
                    "{} is not inside a Go module or GOPATH",
                    dir.display()
                )),
            )
        })
    }
}

/// Lexically resolve `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
