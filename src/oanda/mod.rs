//! OANDA API Client
//!
//! HTTP client, endpoint table, transport seam and wire types for the OANDA
//! v3 REST API.

pub mod client;
pub mod endpoints;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::OandaClient;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
