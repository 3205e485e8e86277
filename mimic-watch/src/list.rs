//! The per-directory list of interfaces to keep mocked.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mimic_source::{Error, Result};

/// Content of a freshly created list file.
pub const PLACEHOLDER: &str = "\
# Interfaces in this directory to keep mocked while `mimic watch` runs.
#
# One entry per line, written like the arguments of `mimic generate`:
#   MyDisplay
#   -m --package mocks io Reader,Writer
#   display.go
";

/// One tracked line of a list file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// 1-based line number in the file.
    pub line: usize,
    /// The line with surrounding whitespace removed.
    pub text: String,
}

/// A list file inside a watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFile {
    path: PathBuf,
}

impl ListFile {
    pub fn new(dir: &Path, file_name: &str) -> Self {
        Self {
            path: dir.join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the file with the placeholder if it is missing.
    ///
    /// Returns whether the file was created.
    pub fn ensure(&self) -> Result<bool> {
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => {
                file.write_all(PLACEHOLDER.as_bytes())
                    .map_err(|e| Error::io(&self.path, e))?;
                tracing::info!(path = %self.path.display(), "created list file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    /// Read the tracked entries. A missing file has none.
    pub fn read(&self) -> Result<Vec<ListEntry>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(parse_entries(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    /// Delete the file. Returns whether there was one.
    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }
}

/// Non-blank, non-comment lines.
pub fn parse_entries(content: &str) -> Vec<ListEntry> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                None
            } else {
                Some(ListEntry {
                    line: i + 1,
                    text: text.to_string(),
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_has_no_entries() {
        assert!(parse_entries(PLACEHOLDER).is_empty());
    }

    #[test]
    fn test_parse_entries_skips_comments_and_blanks() {
        let entries = parse_entries("# header\n\nMyDisplay\n   \n  -m io Reader  \n#Writer\n");
        assert_eq!(
            entries,
            vec![
                ListEntry {
                    line: 3,
                    text: "MyDisplay".into()
                },
                ListEntry {
                    line: 5,
                    text: "-m io Reader".into()
                },
            ]
        );
    }

    #[test]
    fn test_ensure_creates_once() {
        let temp = tempfile::tempdir().unwrap();
        let list = ListFile::new(temp.path(), "interfaces_to_mock");

        assert!(list.ensure().unwrap());
        assert_eq!(fs::read_to_string(list.path()).unwrap(), PLACEHOLDER);

        fs::write(list.path(), "MyDisplay\n").unwrap();
        assert!(!list.ensure().unwrap());
        assert_eq!(list.read().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let list = ListFile::new(temp.path(), "interfaces_to_mock");
        assert!(list.read().unwrap().is_empty());
        assert!(!list.remove().unwrap());
    }
}
