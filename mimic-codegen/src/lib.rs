//! Go code generation for mimic.
//!
//! This crate turns [`InterfaceModel`](mimic_model::InterfaceModel)s into
//! mock sources for the pegomock runtime and decides where they are written.
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, Indent)
//! - [`generator`] - Mock file assembly
//! - [`matcher`] - Argument matcher files
//! - [`output`] - Destination paths and package names
//! - [`pipeline`] - Extract, render and write in one call
//! - [`registry`] - Generated file bookkeeping
//! - [`testing`] - Test utilities (feature-gated)

pub mod builder;
pub mod generator;
mod imports;
pub mod matcher;
mod mock;
pub mod output;
pub mod pipeline;
pub mod registry;
mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use generator::{Destination, generate_mock_file, mock_name_for};
pub use imports::ImportSet;
pub use matcher::{MATCHERS_PACKAGE, generate_matchers};
pub use mock::{MockRenderer, Qualifiers};
pub use output::{OutputPlan, TEST_PACKAGE_SUFFIX, default_mock_path};
pub use pipeline::{Generation, Pipeline};
pub use registry::{FileCategory, FileEntry, FileRegistry, PreviewEntry, WriteStats};
pub use types::{check_resolvable, matcher_name, reflect_type_of, render_type};
