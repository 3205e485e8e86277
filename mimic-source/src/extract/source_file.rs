use std::path::Path;

use mimic_model::InterfaceModel;

use super::StaticAnalyzer;
use crate::syntax::GoParser;
use crate::{Error, PackageLocator, Result};

/// Models for every interface declared in one Go file.
///
/// Generic interfaces are skipped with a warning.
pub fn extract_from_file(path: &Path, locator: &PackageLocator) -> Result<Vec<InterfaceModel>> {
    let mut parser = GoParser::new()?;
    let file = parser.parse_file(path)?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let package_path = locator
        .import_path_of(dir)
        .unwrap_or_else(|| file.package_name.clone());

    let mut analyzer = StaticAnalyzer::new(locator)?;
    let mut models = Vec::with_capacity(file.interfaces.len());
    for decl in &file.interfaces {
        if let Some(reason) = &decl.unsupported {
            tracing::warn!(interface = %decl.name, file = %path.display(), "skipping: {}", reason);
            continue;
        }
        models.push(analyzer.interface_in_file(&file, decl, &package_path)?);
    }

    if models.is_empty() {
        return Err(Error::invalid_arguments(format!(
            "{} declares no interfaces that can be mocked",
            path.display()
        )));
    }

    tracing::debug!(
        file = %path.display(),
        interfaces = models.len(),
        "parsed interfaces from source file"
    );
    Ok(models)
}
