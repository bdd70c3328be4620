//! Domain types
//!
//! Typed values built from OANDA responses, plus the codecs converting them
//! to and from the wire representation in `crate::oanda::types`.

pub mod account;
pub mod order;
pub mod order_book;
pub mod primitives;
pub mod trade;

pub use account::{Account, AccountProperties};
pub use order::{ClientExtensions, OnFill, Order, TrailingOnFill};
pub use order_book::{extract_bucket_vicinity, Bucket, BucketVicinity, OrderBook};
pub use primitives::{
    AccountId, Instrument, OrderId, OrderType, Pips, Price, Side, TimeInForce, TradeId, Units,
};
pub use trade::Trade;
