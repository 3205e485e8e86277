//! Watched directories and what the loop remembers about them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mimic_core::Signature;
use mimic_source::DEFAULT_LIST_FILE;

/// Memory of one list line across ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineState {
    /// Signature of the last successful generation.
    pub last_signature: Option<Signature>,
    /// Message of the last failure, cleared on success.
    pub last_error: Option<String>,
}

/// A directory passed to `mimic watch`.
#[derive(Debug, Clone)]
pub struct WatchTarget {
    pub path: PathBuf,
    pub recursive: bool,
    /// File name of the list file in each watched directory.
    pub list_file: String,
    lines: BTreeMap<(PathBuf, String), LineState>,
}

impl WatchTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
            list_file: DEFAULT_LIST_FILE.to_string(),
            lines: BTreeMap::new(),
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_list_file(mut self, list_file: impl Into<String>) -> Self {
        self.list_file = list_file.into();
        self
    }

    /// State of the line `text` of the list file in `dir`.
    pub fn line_state(&self, dir: &Path, text: &str) -> Option<&LineState> {
        self.lines.get(&(dir.to_path_buf(), text.to_string()))
    }

    pub(crate) fn line_state_mut(&mut self, dir: &Path, text: &str) -> &mut LineState {
        self.lines
            .entry((dir.to_path_buf(), text.to_string()))
            .or_default()
    }

    /// Forget lines that were not seen in the last scan.
    pub(crate) fn retain_lines(&mut self, seen: &[(PathBuf, String)]) {
        self.lines.retain(|key, _| seen.contains(key));
    }

    pub fn tracked_lines(&self) -> usize {
        self.lines.len()
    }
}
