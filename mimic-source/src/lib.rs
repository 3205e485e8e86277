// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Argument resolution and interface model extraction.
//!
//! Turns `generate` arguments into a [`SourceSpec`](mimic_model::SourceSpec)
//! and the spec into [`InterfaceModel`](mimic_model::InterfaceModel)s.

mod config;
mod error;
mod extract;
mod gomod;
mod package;
mod resolve;
pub mod syntax;
mod toolchain;

pub use config::{
    CONFIG_FILE_NAME, Config, DEFAULT_INTERVAL_MS, DEFAULT_LIST_FILE, DEFAULT_RUNTIME,
    GenerateConfig, GoConfig, WatchConfig, find_config,
};
pub use error::{Error, Result, SourceContext};
pub use extract::{
    ExtractOptions, REFLECT_DIR_PREFIX, ReflectProgram, ReflectedInterfaces, StaticAnalyzer, check_preconditions,
    classify_failure, extract, extract_from_file,
};
pub use gomod::{GoModule, PackageLocator, normalize, parse_module_path};
pub use package::{declared_package_name, go_files, package_clause, package_name_of_dir};
pub use resolve::{is_relative_package, looks_like_package_path, resolve_args};
pub use toolchain::GoTool;
