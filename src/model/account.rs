//! Account domain types

use crate::error::Result;
use crate::model::primitives::{parse_decimal, parse_optional_decimal, AccountId};
use crate::oanda::types::{AccountPropertiesWire, AccountWire};
use rust_decimal::Decimal;

/// Entry of the account list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProperties {
    pub id: AccountId,
    pub tags: Vec<String>,
}

impl From<AccountPropertiesWire> for AccountProperties {
    fn from(wire: AccountPropertiesWire) -> Self {
        Self {
            id: AccountId(wire.id),
            tags: wire.tags,
        }
    }
}

/// Account summary
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    /// User-assigned account name
    pub alias: Option<String>,
    pub currency: String,
    pub balance: Decimal,
    /// Realized profit/loss over the account lifetime
    pub pl: Decimal,
    pub unrealized_pl: Decimal,
    pub margin_used: Decimal,
    pub margin_available: Decimal,
    pub margin_rate: Decimal,
    pub open_trade_count: i64,
    pub open_position_count: i64,
    pub pending_order_count: i64,
}

impl TryFrom<AccountWire> for Account {
    type Error = crate::error::OandaError;

    fn try_from(wire: AccountWire) -> Result<Self> {
        Ok(Self {
            balance: parse_decimal("balance", &wire.balance)?,
            pl: parse_optional_decimal("pl", wire.pl.as_deref())?,
            unrealized_pl: parse_optional_decimal("unrealizedPL", wire.unrealized_pl.as_deref())?,
            margin_used: parse_optional_decimal("marginUsed", wire.margin_used.as_deref())?,
            margin_available: parse_optional_decimal(
                "marginAvailable",
                wire.margin_available.as_deref(),
            )?,
            margin_rate: parse_optional_decimal("marginRate", wire.margin_rate.as_deref())?,
            id: AccountId(wire.id),
            alias: wire.alias,
            currency: wire.currency,
            open_trade_count: wire.open_trade_count,
            open_position_count: wire.open_position_count,
            pending_order_count: wire.pending_order_count,
        })
    }
}
