//! Directories a watch target covers.

use std::io;
use std::path::{Path, PathBuf};

use mimic_source::{Error, Result};
use walkdir::{DirEntry, WalkDir};

/// `root`, plus every descendant directory when `recursive`.
///
/// Directories come in name order. Directories the go tool ignores (hidden,
/// `_`-prefixed, `testdata`) and `vendor` are skipped along with everything
/// below them; unreadable entries are logged and skipped.
pub fn watched_dirs(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::io(
            root,
            io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        ));
    }
    if !recursive {
        return Ok(vec![root.to_path_buf()]);
    }

    let dirs = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_dir())
        .map(DirEntry::into_path)
        .collect();
    Ok(dirs)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_dir()
        && (name.starts_with('.') || name.starts_with('_') || name == "vendor" || name == "testdata")
}
