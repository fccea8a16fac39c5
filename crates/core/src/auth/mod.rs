//! Token persistence ports and refresh coordination

pub mod coordinator;
pub mod ports;

pub use coordinator::RefreshCoordinator;
