//! # Medibook Infrastructure
//!
//! Infrastructure implementations of the `medibook-core` ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport and refresh endpoint caller
//! - Token stores (in-memory and JSON file)
//! - Connectivity diagnostics
//! - Configuration loading and tracing setup
//! - Typed API facades for users, articles, clinics, comments, admin and auth
//!
//! ## Architecture
//! - Implements traits defined in `medibook-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod auth;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod http;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use api::MedibookClient;
pub use auth::HttpTokenRefresher;
pub use diagnostics::HttpConnectivityProbe;
pub use http::ReqwestTransport;
pub use observability::init_tracing;
pub use storage::{FileTokenStore, MemoryTokenStore};
