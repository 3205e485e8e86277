//! Registry of the files one generation produces.
//!
//! Mocks are regenerated on every run; matcher files are only created when
//! missing so hand edits survive, unless the caller asks to overwrite them.

use std::path::{Path, PathBuf};

use mimic_core::{File, Overwrite, Signature, WriteResult};
use mimic_source::{Error, Result};

/// Kind of generated file, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileCategory {
    Mock,
    Matcher,
}

impl FileCategory {
    pub fn default_overwrite(&self) -> Overwrite {
        match self {
            FileCategory::Mock => Overwrite::Always,
            FileCategory::Matcher => Overwrite::IfMissing,
        }
    }
}

/// A file to be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path, or relative to the working directory.
    pub path: PathBuf,
    pub content: String,
    pub category: FileCategory,
    /// Override of the category's overwrite behavior.
    pub overwrite: Option<Overwrite>,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, category: FileCategory) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            category,
            overwrite: None,
        }
    }

    pub fn mock(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Mock)
    }

    pub fn matcher(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Matcher)
    }

    pub fn with_overwrite(mut self, overwrite: Overwrite) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    pub fn overwrite(&self) -> Overwrite {
        self.overwrite
            .unwrap_or_else(|| self.category.default_overwrite())
    }

    pub fn full_path(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }

    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = self.full_path(base);
        File::new(&path, self.content.as_str())
            .overwrite(self.overwrite())
            .write()
            .map_err(|e| Error::io(&path, e))
    }
}

/// Every file of one generation, written mocks first.
#[derive(Debug, Default, Clone)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: FileEntry) {
        self.entries.push(entry);
    }

    /// Entries in category order, registration order within a category.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.category);
        sorted.into_iter()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fingerprint of every path and content, used to detect no-op regenerations.
    pub fn signature(&self) -> Signature {
        let paths: Vec<String> = self
            .entries()
            .map(|e| e.path.to_string_lossy().into_owned())
            .collect();
        let parts = self
            .entries()
            .zip(&paths)
            .flat_map(|(e, p)| [p.as_str(), e.content.as_str()]);
        Signature::of(parts)
    }

    pub fn preview(&self) -> Vec<PreviewEntry> {
        self.entries()
            .map(|e| PreviewEntry {
                path: e.path.clone(),
                content: e.content.clone(),
                category: e.category,
            })
            .collect()
    }

    /// Write every file under `base`.
    ///
    /// Stops at the first failure; files already written stay on disk.
    pub fn write_all(&self, base: &Path) -> Result<WriteStats> {
        let mut stats = WriteStats::default();

        for entry in self.entries() {
            match entry.write(base)? {
                WriteResult::Written => {
                    stats.written += 1;
                    stats.written_paths.push(entry.path.clone());
                }
                WriteResult::Skipped => {
                    stats.skipped += 1;
                    stats.skipped_paths.push(entry.path.clone());
                }
            }
        }

        Ok(stats)
    }
}

/// A file as `--dry-run` shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    pub path: PathBuf,
    pub content: String,
    pub category: FileCategory,
}

/// What a write pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    pub written: usize,
    /// Files left alone because they already existed.
    pub skipped: usize,
    pub written_paths: Vec<PathBuf>,
    pub skipped_paths: Vec<PathBuf>,
}

impl WriteStats {
    pub fn total(&self) -> usize {
        self.written + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_entry_categories() {
        let mock = FileEntry::mock("mock_display_test.go", "");
        assert_eq!(mock.overwrite(), Overwrite::Always);

        let matcher = FileEntry::matcher("matchers/time_time.go", "");
        assert_eq!(matcher.overwrite(), Overwrite::IfMissing);

        let forced = FileEntry::matcher("matchers/time_time.go", "").with_overwrite(Overwrite::Always);
        assert_eq!(forced.overwrite(), Overwrite::Always);
    }

    #[test]
    fn test_entries_sorted_by_category() {
        let mut registry = FileRegistry::new();
        registry.register(FileEntry::matcher("matchers/a.go", ""));
        registry.register(FileEntry::mock("mock_a_test.go", ""));
        registry.register(FileEntry::matcher("matchers/b.go", ""));

        let paths: Vec<_> = registry.entries().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("mock_a_test.go"),
                PathBuf::from("matchers/a.go"),
                PathBuf::from("matchers/b.go"),
            ]
        );
    }

    #[test]
    fn test_write_all_keeps_existing_matchers() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("matchers")).unwrap();
        fs::write(temp.path().join("matchers/a.go"), "edited").unwrap();
        fs::write(temp.path().join("mock_a_test.go"), "stale").unwrap();

        let mut registry = FileRegistry::new();
        registry.register(FileEntry::mock("mock_a_test.go", "fresh"));
        registry.register(FileEntry::matcher("matchers/a.go", "generated"));
        registry.register(FileEntry::matcher("matchers/b.go", "generated"));

        let stats = registry.write_all(temp.path()).unwrap();
        assert_eq!(stats.written, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.skipped_paths, vec![PathBuf::from("matchers/a.go")]);
        assert_eq!(fs::read_to_string(temp.path().join("mock_a_test.go")).unwrap(), "fresh");
        assert_eq!(fs::read_to_string(temp.path().join("matchers/a.go")).unwrap(), "edited");
    }

    #[test]
    fn test_signature_tracks_content() {
        let mut a = FileRegistry::new();
        a.register(FileEntry::mock("mock_a_test.go", "one"));
        let mut b = FileRegistry::new();
        b.register(FileEntry::mock("mock_a_test.go", "one"));
        assert_eq!(a.signature(), b.signature());

        b.register(FileEntry::matcher("matchers/x.go", ""));
        assert_ne!(a.signature(), b.signature());
    }

    #[test]
    fn test_write_error_names_the_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("blocker"), "").unwrap();

        let mut registry = FileRegistry::new();
        registry.register(FileEntry::mock("blocker/mock_a_test.go", ""));
        let err = registry.write_all(temp.path()).unwrap_err();
        assert!(matches!(*err, Error::Io { ref path, .. } if path.ends_with("blocker/mock_a_test.go")));
    }
}
