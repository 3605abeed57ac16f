//! # docuflow-core
//!
//! Core types, traits, and abstractions for the DocuFlow document
//! management service.
//!
//! This crate provides the foundational data structures and trait
//! definitions that other DocuFlow crates depend on.

pub mod error;
pub mod file_safety;
pub mod models;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use file_safety::sanitize_filename;
pub use models::*;
pub use tags::{normalize_tags, parse_tag_csv, validate_tag, MAX_TAG_LENGTH};
pub use traits::*;
