//! Scalar domain types shared by accounts, orders, trades and order books
//!
//! Decimal values travel over the wire as strings. The helpers here parse them
//! into typed values and name the offending field when a value is malformed.

use crate::error::{OandaError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fractional digits used when a price is written to the wire
pub const PRICE_WIRE_PRECISION: u32 = 7;

/// Parses a string-encoded decimal field
pub fn parse_decimal(field: &str, raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| OandaError::malformed(field, raw, e))
}

/// Parses an optional decimal field; absent values read as zero
pub fn parse_optional_decimal(field: &str, raw: Option<&str>) -> Result<Decimal> {
    raw.map(|v| parse_decimal(field, v))
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Parses an RFC3339 timestamp field
pub fn parse_time(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| OandaError::malformed(field, raw, e))
}

/// Instrument price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Self {
        Price(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn parse(field: &str, raw: &str) -> Result<Self> {
        parse_decimal(field, raw).map(Price)
    }

    /// Wire representation with exactly seven fractional digits
    pub fn to_wire(&self) -> String {
        format!(
            "{:.prec$}",
            self.0.round_dp(PRICE_WIRE_PRECISION),
            prec = PRICE_WIRE_PRECISION as usize
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Price(value)
    }
}

/// Distance expressed in pips
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Pips(pub Decimal);

impl Pips {
    /// Converts the distance to a price delta for `instrument`
    ///
    /// Returns `None` for instruments without a known pip size.
    pub fn to_price(&self, instrument: &Instrument) -> Option<Price> {
        instrument.pip_size().map(|size| Price(self.0 * size))
    }
}

/// Signed order or trade size; negative values are short
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Units(pub i64);

impl Units {
    pub fn parse(field: &str, raw: &str) -> Result<Self> {
        raw.trim()
            .parse::<i64>()
            .map(Units)
            .map_err(|e| OandaError::malformed(field, raw, e))
    }

    pub fn from_side(side: &Side, amount: u32) -> Self {
        match side {
            Side::Sell => Units(-i64::from(amount)),
            _ => Units(i64::from(amount)),
        }
    }

    pub fn side(&self) -> Side {
        if self.0 < 0 {
            Side::Sell
        } else {
            Side::Buy
        }
    }

    pub fn to_wire(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declares a string tag with a closed set of known values
///
/// Unknown values decode into `Other` and re-encode unchanged.
macro_rules! wire_tag {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $($wire => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                $name::from(raw.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                String::deserialize(deserializer).map($name::from)
            }
        }
    };
}

wire_tag! {
    /// Order direction
    Side {
        Buy => "buy",
        Sell => "sell",
    }
}

wire_tag! {
    /// Order type tag
    OrderType {
        Market => "MARKET",
        Limit => "LIMIT",
        Stop => "STOP",
        MarketIfTouched => "MARKET_IF_TOUCHED",
        TakeProfit => "TAKE_PROFIT",
        StopLoss => "STOP_LOSS",
        GuaranteedStopLoss => "GUARANTEED_STOP_LOSS",
        TrailingStopLoss => "TRAILING_STOP_LOSS",
        FixedPrice => "FIXED_PRICE",
    }
}

wire_tag! {
    /// Order lifetime policy
    TimeInForce {
        Gtc => "GTC",
        Gtd => "GTD",
        Gfd => "GFD",
        Fok => "FOK",
        Ioc => "IOC",
    }
}

wire_tag! {
    /// Tradable currency pair
    Instrument {
        UsdJpy => "USD_JPY",
        EurJpy => "EUR_JPY",
        EurUsd => "EUR_USD",
    }
}

impl Instrument {
    /// Smallest standard price increment
    pub fn pip_size(&self) -> Option<Decimal> {
        match self {
            Instrument::UsdJpy | Instrument::EurJpy => Some(Decimal::new(1, 2)),
            Instrument::EurUsd => Some(Decimal::new(1, 4)),
            Instrument::Other(_) => None,
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                $name(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                $name(raw)
            }
        }
    };
}

string_id!(
    /// Account identifier, e.g. `101-004-1234567-001`
    AccountId
);
string_id!(OrderId);
string_id!(TradeId);
