//! # dirgraph Domain
//!
//! Data types shared by the directory object model.
//!
//! This crate contains:
//! - Directory object type tags and the discriminator lookup table
//! - The schema-less property bag with typed accessors
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other dirgraph crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
