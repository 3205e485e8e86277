//! Interface model and generation request types for mimic.
//!
//! This crate provides the language-agnostic description of an interface
//! that every extraction strategy produces and the code generator consumes.
//!
//! # Architecture
//!
//! ```text
//! CLI args → SourceSpec → extractor → InterfaceModel → codegen → files
//! ```
//!
//! The model types are designed to be:
//! - Strategy-agnostic (reflection and static analysis produce the same shape)
//! - Destination-agnostic (types carry full import paths, never aliases)
//! - Serializable (the reflection helper program speaks this shape as JSON)

mod interface;
mod request;
mod types;

pub use interface::{InterfaceModel, Method, Parameter, ResultValue, synthesized_param_name};
pub use request::{GenerationRequest, SourceSpec};
pub use types::{ChanDir, PRIMITIVE_TYPES, TypeRef};
