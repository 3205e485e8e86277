//! Watch mode.
//!
//! Every watched directory carries an `interfaces_to_mock` list. Each tick the
//! lists are re-read and every line is regenerated through the same pipeline
//! as `mimic generate`; output that has not changed is left alone.

mod args;
mod discover;
mod list;
mod regenerate;
mod remove;
mod target;
mod watcher;

pub use args::{GenerateArgs, parse_list_line};
pub use discover::watched_dirs;
pub use list::{ListEntry, ListFile, PLACEHOLDER, parse_entries};
pub use regenerate::{Outcome, Regenerate};
pub use remove::remove_list_files;
pub use target::{LineState, WatchTarget};
pub use watcher::{TickReport, WatchState, Watcher};
