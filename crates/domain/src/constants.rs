//! Application constants
//!
//! Centralized location for the defaults used when no configuration
//! overrides them.

// API defaults
pub const DEFAULT_BASE_URL: &str = "https://api.medibook.app/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "medibook-client/0.1";
pub const HEALTH_PATH: &str = "/health";
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

// Token refresh
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 30;

// Comments cache
pub const COMMENTS_CACHE_TTL_SECS: u64 = 300;
pub const COMMENTS_CACHE_PREFIX: &str = "comments_cache_";

// Headers
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";
