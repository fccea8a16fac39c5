//! Common utilities shared across Medibook crates.
//!
//! - [`cache`]: time-expiring key/value cache with prefix-scoped clearing
//! - [`time`]: clock abstraction with a controllable mock for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod time;
