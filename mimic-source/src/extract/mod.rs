//! Interface model extraction.
//!
//! Three strategies produce the same [`InterfaceModel`]s:
//!
//! - **reflection** (default): compiles a throwaway program against the
//!   target package and asks `reflect` for the method sets
//! - **static analysis**: parses the package sources with tree-sitter
//! - **source file**: parses a single file named on the command line

mod reflect;
mod source_file;
mod static_analysis;

use std::io::Write;
use std::path::{Path, PathBuf};

use mimic_model::{InterfaceModel, SourceSpec, synthesized_param_name};

use crate::{Error, GoTool, PackageLocator, Result, package};

pub use reflect::{REFLECT_DIR_PREFIX, ReflectProgram, ReflectedInterfaces, classify_failure};
pub use source_file::extract_from_file;
pub use static_analysis::StaticAnalyzer;

/// How to run an extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub working_dir: PathBuf,
    pub use_static_analysis: bool,
    pub debug: bool,
    /// Set by the watch coordinator; static analysis is rejected there.
    pub watch_mode: bool,
    pub go: GoTool,
}

impl ExtractOptions {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            use_static_analysis: false,
            debug: false,
            watch_mode: false,
            go: GoTool::default(),
        }
    }

    pub fn with_static_analysis(mut self, enabled: bool) -> Self {
        self.use_static_analysis = enabled;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_watch_mode(mut self, watch_mode: bool) -> Self {
        self.watch_mode = watch_mode;
        self
    }

    pub fn with_go(mut self, go: GoTool) -> Self {
        self.go = go;
        self
    }
}

/// Reject strategy combinations that cannot work, before touching the filesystem.
pub fn check_preconditions(spec: &SourceSpec, options: &ExtractOptions) -> Result<()> {
    if !options.use_static_analysis {
        return Ok(());
    }
    if options.watch_mode {
        return Err(Error::unsupported_mode("is not supported in watch mode"));
    }
    if spec.is_go_file() {
        return Err(Error::unsupported_mode(
            "does not apply to a single Go file argument",
        ));
    }
    let count = spec.interface_names().len();
    if count != 1 {
        return Err(Error::unsupported_mode(format!(
            "supports exactly one interface, got {}",
            count
        )));
    }
    Ok(())
}

/// Extract interface models for `spec`.
///
/// With `debug` set, one line per discovered method is written to `trace`.
pub fn extract(
    spec: &SourceSpec,
    options: &ExtractOptions,
    trace: &mut dyn Write,
) -> Result<Vec<InterfaceModel>> {
    check_preconditions(spec, options)?;

    let locator = PackageLocator::discover(&options.working_dir, &options.go)?;
    let mut models = match spec {
        SourceSpec::GoFile { path } => {
            let path = absolute(&options.working_dir, path);
            extract_from_file(&path, &locator)?
        }
        SourceSpec::PackageAndInterfaces {
            package_path,
            interface_names,
        } => {
            let target = Target::for_package(package_path, &locator)?;
            extract_package(&target, interface_names, options, &locator)?
        }
        SourceSpec::BareInterfaceNames { names } => {
            let target = Target::for_dir(&options.working_dir, &locator);
            extract_package(&target, names, options, &locator)?
        }
    };

    for model in &mut models {
        name_parameters(model);
    }

    if options.debug {
        write_trace(&models, trace);
    }

    Ok(models)
}

/// The package interfaces are extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    /// Import path; `None` when the directory is outside any module.
    pub import_path: Option<String>,
    /// Source directory, when it exists locally.
    pub dir: Option<PathBuf>,
    /// The package as the user wrote it, for error messages.
    pub display: String,
}

impl Target {
    fn for_package(package_path: &str, locator: &PackageLocator) -> Result<Self> {
        let import_path = locator.canonical_import_path(package_path)?;
        Ok(Self {
            dir: locator.locate(package_path),
            import_path: Some(import_path),
            display: package_path.to_string(),
        })
    }

    fn for_dir(dir: &Path, locator: &PackageLocator) -> Self {
        Self {
            import_path: locator.import_path_of(dir),
            dir: Some(dir.to_path_buf()),
            display: dir.display().to_string(),
        }
    }
}

fn extract_package(
    target: &Target,
    names: &[String],
    options: &ExtractOptions,
    locator: &PackageLocator,
) -> Result<Vec<InterfaceModel>> {
    if options.use_static_analysis {
        tracing::debug!(package = %target.display, "extracting with static analysis");
        let dir = target.dir.clone().ok_or_else(|| {
            Error::package_not_found(
                &target.display,
                Some("no source directory found in the module, vendor/ or GOROOT".into()),
            )
        })?;
        let package_path = target.import_path.clone().unwrap_or_else(|| {
            package::package_name_of_dir(&dir)
        });
        let mut analyzer = StaticAnalyzer::new(locator)?;
        names
            .iter()
            .map(|name| analyzer.interface(&package_path, &dir, name))
            .collect()
    } else {
        tracing::debug!(package = %target.display, "extracting with reflection");
        let import_path = target.import_path.as_deref().ok_or_else(|| {
            Error::package_not_found(
                &target.display,
                Some("reflection needs the package to be inside a Go module (go.mod) or GOPATH".into()),
            )
        })?;
        let program = ReflectProgram::new(import_path, names);
        program.run(&options.working_dir, &options.go)
    }
}

/// Give every unnamed or blank parameter its positional name.
fn name_parameters(model: &mut InterfaceModel) {
    for method in &mut model.methods {
        for (i, param) in method.parameters.iter_mut().enumerate() {
            if param.name.is_empty() || param.name == "_" {
                param.name = synthesized_param_name(i);
            }
        }
    }
}

fn write_trace(models: &[InterfaceModel], trace: &mut dyn Write) {
    for model in models {
        for method in &model.methods {
            // Trace failures never affect the extraction.
            let _ = writeln!(
                trace,
                "{}.{}: {} parameter(s)",
                model.name,
                method.name,
                method.parameters.len()
            );
        }
    }
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
