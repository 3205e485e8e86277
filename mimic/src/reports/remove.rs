//! Remove command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from removing list files.
#[derive(Debug)]
pub struct RemoveReport {
    /// Deleted list files.
    pub removed: Vec<PathBuf>,
}

impl Report for RemoveReport {
    fn render(&self, out: &mut dyn Output) {
        if self.removed.is_empty() {
            out.preformatted("No list files found.");
            return;
        }

        out.section("Removed");
        for path in &self.removed {
            out.removed_item(&path.display().to_string());
        }
        out.newline();
    }
}
