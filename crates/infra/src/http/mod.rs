//! HTTP transport adapter

mod client;

pub use client::{ReqwestTransport, ReqwestTransportBuilder};
