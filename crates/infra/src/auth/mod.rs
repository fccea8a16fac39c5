//! Refresh endpoint adapter

mod refresher;

pub use refresher::HttpTokenRefresher;
