//! # Medibook Domain
//!
//! Domain types shared by every Medibook client crate.
//!
//! This crate contains:
//! - Credential and session types (`Credentials`, `TokenPair`)
//! - The HTTP request/response descriptors used by the client pipeline
//! - Resource DTOs for users, articles, clinics, comments and admin calls
//! - The tagged error taxonomy (`ApiError`, `AuthError`)
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Medibook crates
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
