//! # dirgraph Infrastructure
//!
//! Infrastructure implementations of the `dirgraph-core` ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP client and `Transport` adapter
//! - The console confirmation prompt
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `dirgraph-core`
//! - Contains all "impure" code (network, console, environment)

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod prompt;

// Re-export commonly used items
pub use bootstrap::{connect, connect_with_prompt};
pub use errors::InfraError;
pub use http::*;
pub use observability::init_tracing;
pub use prompt::ConsolePrompt;
