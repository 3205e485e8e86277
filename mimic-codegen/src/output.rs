//! Where generated files go and which package they declare.

use std::path::{Path, PathBuf};

use mimic_model::{GenerationRequest, InterfaceModel, SourceSpec};
use mimic_source::{GoModule, Result, normalize, package_name_of_dir};

use crate::matcher::MATCHERS_PACKAGE;

/// Package suffix of external test packages.
pub const TEST_PACKAGE_SUFFIX: &str = "_test";

/// Resolved destination of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    /// Mock file, relative to the working directory unless absolute.
    pub mock_path: PathBuf,
    /// Directory matcher files are written to (`<mock dir>/matchers`).
    pub matchers_dir: PathBuf,
    /// Package clause of the mock file.
    pub package_name: String,
    /// Import path whose types the mock file references unqualified.
    pub self_package: Option<String>,
}

impl OutputPlan {
    pub fn for_request(request: &GenerationRequest, models: &[InterfaceModel]) -> Result<Self> {
        let mock_path = match &request.output_path {
            Some(path) => path.clone(),
            None => default_mock_path(&request.source_spec, models),
        };
        let mock_dir = normalize(&request.working_dir.join(&mock_path))
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| request.working_dir.clone());

        let package_name = match &request.output_package_name {
            Some(name) => name.clone(),
            None => format!("{}{}", package_name_of_dir(&mock_dir), TEST_PACKAGE_SUFFIX),
        };

        let self_package = match &request.self_package_path {
            Some(path) => Some(path.clone()),
            None => infer_self_package(&mock_dir, &package_name, models)?,
        };

        let matchers_dir = mock_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(MATCHERS_PACKAGE);

        Ok(Self {
            mock_path,
            matchers_dir,
            package_name,
            self_package,
        })
    }
}

/// `mock_<name>_test.go` next to the source.
///
/// The name is the lower-cased Go file stem for a file argument, otherwise
/// the lower-cased interface names joined by `_`.
pub fn default_mock_path(spec: &SourceSpec, models: &[InterfaceModel]) -> PathBuf {
    match spec {
        SourceSpec::GoFile { path } => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            let file = format!("mock_{}{}.go", stem, TEST_PACKAGE_SUFFIX);
            match path.parent() {
                Some(parent) => parent.join(file),
                None => PathBuf::from(file),
            }
        }
        _ => {
            let names: Vec<String> = if models.is_empty() {
                spec.interface_names().iter().map(|n| n.to_lowercase()).collect()
            } else {
                models.iter().map(|m| m.name.to_lowercase()).collect()
            };
            PathBuf::from(format!("mock_{}{}.go", names.join("_"), TEST_PACKAGE_SUFFIX))
        }
    }
}

/// The mock shares the interfaces' package when it sits in their directory
/// and declares their package name.
fn infer_self_package(
    mock_dir: &Path,
    package_name: &str,
    models: &[InterfaceModel],
) -> Result<Option<String>> {
    let Some(first) = models.first() else {
        return Ok(None);
    };
    if models.iter().any(|m| m.package_path != first.package_path)
        || package_name != first.package_name
    {
        return Ok(None);
    }
    let dir_import_path = GoModule::find(mock_dir)?.and_then(|m| m.import_path_of(mock_dir));
    if dir_import_path.as_deref() == Some(first.package_path.as_str()) {
        Ok(Some(first.package_path.clone()))
    } else {
        Ok(None)
    }
}
