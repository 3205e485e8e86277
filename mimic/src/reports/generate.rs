//! Generate command report data structures.

use std::path::PathBuf;

use mimic_codegen::WriteStats;

use super::output::{Output, Report};

/// Report data from mock generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Names of the mocked interfaces.
    pub interfaces: Vec<String>,
    /// Mock files of this generation.
    pub mocks: Vec<MockSummary>,
    pub result: GenerationResult,
}

/// A mock file and the package it declares.
#[derive(Debug)]
pub struct MockSummary {
    pub path: PathBuf,
    pub package: String,
}

/// Result of generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WriteStats),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: PathBuf,
    pub content: String,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(stats) => {
                out.section(&format!("Mocked {}", self.interfaces.join(", ")));
                for path in &stats.written_paths {
                    out.added_item(&path.display().to_string());
                }
                for path in &stats.skipped_paths {
                    out.list_item(&format!("{} (kept)", path.display()));
                }
            }
            GenerationResult::Preview(files) => {
                for file in files {
                    out.divider(&file.path.display().to_string());
                    out.preformatted(file.content.trim_end());
                }
                out.divider("Summary");
                for mock in &self.mocks {
                    out.list_item(&format!(
                        "{} (package {})",
                        mock.path.display(),
                        mock.package
                    ));
                }
                out.preformatted(&format!("{} files would be generated", files.len()));
            }
        }
    }
}
