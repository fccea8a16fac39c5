//! Domain types organized by feature area

pub mod admin;
pub mod article;
pub mod auth;
pub mod clinic;
pub mod comment;
pub mod http;
pub mod user;

// Re-export all types for convenience
pub use admin::*;
pub use article::*;
pub use auth::*;
pub use clinic::*;
pub use comment::*;
pub use http::*;
pub use user::*;
