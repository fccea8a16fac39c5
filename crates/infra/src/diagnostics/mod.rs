//! Connectivity diagnostics

mod probe;

pub use probe::HttpConnectivityProbe;
