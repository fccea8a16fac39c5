//! Client configuration loading
//!
//! Reads [`Config`](medibook_domain::Config) from environment variables or
//! JSON/TOML files and validates the API base URL.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
