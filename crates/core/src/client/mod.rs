//! Authenticated API client
//!
//! Request flow:
//! 1. [`interceptor::attach_bearer`] reads the access token from the store
//! 2. The request goes through the [`HttpTransport`](ports::HttpTransport)
//! 3. A 401 asks the [`RefreshCoordinator`](crate::RefreshCoordinator) for
//!    a new token and replays the request once

pub mod interceptor;
pub mod ports;
mod service;

pub use service::{ApiClient, ApiClientBuilder};
