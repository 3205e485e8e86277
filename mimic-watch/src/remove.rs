//! Undo of watch mode's list files.

use std::path::PathBuf;

use mimic_source::Result;

use crate::discover::watched_dirs;
use crate::list::ListFile;

/// Delete the list file in every directory of `roots`.
///
/// Returns the files that were deleted.
pub fn remove_list_files(roots: &[PathBuf], recursive: bool, file_name: &str) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for root in roots {
        for dir in watched_dirs(root, recursive)? {
            let list = ListFile::new(&dir, file_name);
            if list.remove()? {
                tracing::debug!(path = %list.path().display(), "removed list file");
                removed.push(list.path().to_path_buf());
            }
        }
    }
    Ok(removed)
}
