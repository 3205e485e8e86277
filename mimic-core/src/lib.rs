//! Core utilities and types for the mimic mock generator.
//!
//! This crate provides the file-writing primitives and the Go naming helpers
//! shared by the rest of the workspace.

mod file;
mod naming;
mod signature;

// File operations
pub use file::{File, GENERATED_HEADER, Overwrite, WriteResult};
// Go naming helpers
pub use naming::{
    GO_KEYWORDS, is_exported, is_go_identifier, lower_first, to_pascal_case, to_snake_case,
    upper_first,
};
pub use signature::Signature;
