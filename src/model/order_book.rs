//! Order book snapshot and bucket vicinity extraction
//!
//! An OANDA order book is a price-ascending list of buckets, each carrying the
//! share of long and short interest at that price level.

use crate::error::{OandaError, Result};
use crate::model::primitives::{
    parse_decimal, parse_optional_decimal, parse_time, Instrument, Price,
};
use crate::oanda::types::{BucketWire, OrderBookWire};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

/// One price level of an order book snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub price: Price,
    pub long_count_percent: Decimal,
    pub short_count_percent: Decimal,
}

/// Order book snapshot for a single instrument
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBook {
    pub instrument: Instrument,
    pub time: DateTime<Utc>,
    /// Reference price at snapshot time
    pub price: Price,
    pub bucket_width: Decimal,
    /// Ascending by price, as delivered upstream
    pub buckets: Vec<Bucket>,
}

/// Buckets flanking a target price, nearest first on both sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketVicinity {
    /// Descending by price
    pub lower: Vec<Bucket>,
    /// Ascending by price
    pub higher: Vec<Bucket>,
}

impl OrderBook {
    /// Returns the `n` buckets on each side of `price`
    ///
    /// The split happens at the first bucket priced above `price`. The bucket
    /// immediately preceding it opens the higher window, so the lower window
    /// starts one bucket further down.
    ///
    /// # Errors
    /// * `InsufficientLowerBuckets` - fewer than `n` buckets below the split,
    ///   or `price` is below every bucket
    /// * `InsufficientHigherBuckets` - fewer than `n` buckets from the split
    ///   upward, or no bucket is priced above `price`
    pub fn extract_bucket_vicinity(&self, price: Price, n: usize) -> Result<BucketVicinity> {
        extract_bucket_vicinity(&self.buckets, price, n)
    }
}

/// Splits price-ascending `buckets` around `price` into two windows of `n`
pub fn extract_bucket_vicinity(
    buckets: &[Bucket],
    price: Price,
    n: usize,
) -> Result<BucketVicinity> {
    debug!(buckets = buckets.len(), %price, n, "Extracting bucket vicinity");

    let crossing = buckets
        .iter()
        .position(|b| b.price > price)
        .ok_or(OandaError::InsufficientHigherBuckets {
            requested: n,
            available: 0,
        })?;

    // Crossing at the first bucket leaves nothing below the price.
    let pivot = crossing.checked_sub(1).ok_or(OandaError::InsufficientLowerBuckets {
        requested: n,
        available: 0,
    })?;

    let (below, above) = buckets.split_at(pivot);
    debug!(lower = below.len(), higher = above.len(), "Split order book");

    if below.len() < n {
        return Err(OandaError::InsufficientLowerBuckets {
            requested: n,
            available: below.len(),
        });
    }
    if above.len() < n {
        return Err(OandaError::InsufficientHigherBuckets {
            requested: n,
            available: above.len(),
        });
    }

    Ok(BucketVicinity {
        lower: below.iter().rev().take(n).copied().collect(),
        higher: above[..n].to_vec(),
    })
}

impl TryFrom<BucketWire> for Bucket {
    type Error = OandaError;

    fn try_from(wire: BucketWire) -> Result<Self> {
        Ok(Self {
            price: Price::parse("buckets.price", &wire.price)?,
            long_count_percent: parse_decimal(
                "buckets.longCountPercent",
                &wire.long_count_percent,
            )?,
            short_count_percent: parse_decimal(
                "buckets.shortCountPercent",
                &wire.short_count_percent,
            )?,
        })
    }
}

impl TryFrom<OrderBookWire> for OrderBook {
    type Error = OandaError;

    fn try_from(wire: OrderBookWire) -> Result<Self> {
        Ok(Self {
            time: parse_time("time", &wire.time)?,
            price: Price::parse("price", &wire.price)?,
            bucket_width: parse_optional_decimal("bucketWidth", wire.bucket_width.as_deref())?,
            buckets: wire
                .buckets
                .into_iter()
                .map(Bucket::try_from)
                .collect::<Result<Vec<_>>>()?,
            instrument: Instrument::from(wire.instrument),
        })
    }
}
