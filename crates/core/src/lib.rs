//! # Medibook Core
//!
//! Client logic with no transport or storage code.
//!
//! This crate contains:
//! - Port interfaces for token persistence, token refresh and HTTP transport
//! - The single-flight refresh coordinator
//! - The authenticated client pipeline (bearer attach, 401 handling, replay)
//!
//! ## Architecture Principles
//! - Only depends on `medibook-domain`
//! - No reqwest, filesystem or platform code
//! - All external dependencies via traits

pub mod auth;
pub mod client;

pub use auth::ports::{TokenRefresher, TokenStore};
pub use auth::RefreshCoordinator;
pub use client::ports::{ConnectivityProbe, Diagnosis, HttpTransport};
pub use client::{ApiClient, ApiClientBuilder};
