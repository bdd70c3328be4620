//! Client library for the OANDA v3 REST trading API
//!
//! Fetches accounts, orders, open trades and order book snapshots, creates,
//! updates and cancels orders, and closes trades. Order books can be narrowed
//! to the buckets surrounding a price with
//! [`OrderBook::extract_bucket_vicinity`](model::OrderBook::extract_bucket_vicinity).

pub mod config; // Configuration, credentials and parameter store
pub mod error;
pub mod model; // Domain types and codecs
pub mod oanda; // OANDA API client

pub use config::{ClientConfig, Environment};
pub use error::{OandaError, Result};
pub use oanda::OandaClient;
