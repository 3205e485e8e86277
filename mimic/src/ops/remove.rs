//! Remove operation - delete the list files watch mode created.

use std::path::{Path, PathBuf};

use mimic_source::Result;
use mimic_watch::remove_list_files;

use crate::reports::RemoveReport;

/// Options for the remove operation.
pub struct RemoveOptions<'a> {
    pub recursive: bool,
    /// File name of the list files.
    pub list_file: &'a str,
    /// Paths in the report are shown relative to this directory.
    pub base: &'a Path,
}

/// Execute the remove operation.
pub fn remove(roots: &[PathBuf], opts: RemoveOptions) -> Result<RemoveReport> {
    let removed = remove_list_files(roots, opts.recursive, opts.list_file)?
        .into_iter()
        .map(|path| {
            path.strip_prefix(opts.base)
                .map(Path::to_path_buf)
                .unwrap_or(path)
        })
        .collect();
    Ok(RemoveReport { removed })
}
