//! Core operations.
//!
//! This module contains the business logic for mimic commands,
//! separated from CLI argument parsing and output rendering.

pub mod generate;
pub mod remove;
pub mod watch;

pub use generate::generate;
pub use remove::remove;
pub use watch::watch;
