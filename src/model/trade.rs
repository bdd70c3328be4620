//! Open trade domain type

use crate::error::{OandaError, Result};
use crate::model::primitives::{
    parse_optional_decimal, parse_time, Instrument, Price, TradeId, Units,
};
use crate::oanda::types::TradeWire;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub id: TradeId,
    pub instrument: Instrument,
    /// Fill price of the opening order
    pub price: Price,
    pub open_time: DateTime<Utc>,
    pub state: Option<String>,
    pub initial_units: Units,
    pub current_units: Units,
    pub realized_pl: Decimal,
    pub unrealized_pl: Decimal,
    pub financing: Decimal,
}

impl TryFrom<TradeWire> for Trade {
    type Error = OandaError;

    fn try_from(wire: TradeWire) -> Result<Self> {
        Ok(Self {
            price: Price::parse("price", &wire.price)?,
            open_time: parse_time("openTime", &wire.open_time)?,
            initial_units: Units::parse("initialUnits", &wire.initial_units)?,
            current_units: Units::parse("currentUnits", &wire.current_units)?,
            realized_pl: parse_optional_decimal("realizedPL", wire.realized_pl.as_deref())?,
            unrealized_pl: parse_optional_decimal("unrealizedPL", wire.unrealized_pl.as_deref())?,
            financing: parse_optional_decimal("financing", wire.financing.as_deref())?,
            id: TradeId(wire.id),
            instrument: Instrument::from(wire.instrument),
            state: wire.state,
        })
    }
}

/// Converts every trade of a response, failing on the first malformed one
pub fn decode_trades(wires: Vec<TradeWire>) -> Result<Vec<Trade>> {
    wires.into_iter().map(Trade::try_from).collect()
}
