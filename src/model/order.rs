//! Order domain types and the order codec
//!
//! Orders are decoded from the v3 order representation and encoded back into
//! the `{"order": {...}}` request body used by create and update.

use crate::error::{OandaError, Result};
use crate::model::primitives::{
    parse_time, Instrument, OrderId, OrderType, Price, TimeInForce, Units,
};
use crate::oanda::types::{
    ClientExtensionsWire, OnFillWire, OrderRequest, OrderRequestBody, OrderWire,
    TrailingOnFillWire,
};
use chrono::{DateTime, SecondsFormat, Utc};

/// Take-profit or stop-loss attached to an order fill
#[derive(Debug, Clone, PartialEq)]
pub struct OnFill {
    pub price: Price,
    pub time_in_force: Option<TimeInForce>,
}

/// Trailing stop-loss attached to an order fill
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingOnFill {
    /// Price distance from the current price
    pub distance: Price,
    pub time_in_force: Option<TimeInForce>,
}

/// Client-side tagging of an order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientExtensions {
    pub id: Option<String>,
    pub tag: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Server-assigned id; absent for orders not yet created
    pub id: Option<OrderId>,
    pub order_type: OrderType,
    /// Absent for orders attached to a trade (take profit, stop loss)
    pub instrument: Option<Instrument>,
    pub units: Option<Units>,
    pub price: Option<Price>,
    pub time_in_force: Option<TimeInForce>,
    pub gtd_time: Option<DateTime<Utc>>,
    pub create_time: Option<DateTime<Utc>>,
    pub state: Option<String>,
    pub partial_fill: Option<String>,
    pub position_fill: Option<String>,
    pub trigger_condition: Option<String>,
    pub replaces_order_id: Option<OrderId>,
    pub client_extensions: Option<ClientExtensions>,
    pub take_profit_on_fill: Option<OnFill>,
    pub stop_loss_on_fill: Option<OnFill>,
    pub trailing_stop_loss_on_fill: Option<TrailingOnFill>,
}

impl Order {
    /// Creates an order that has not been submitted yet
    pub fn new(order_type: OrderType, instrument: Instrument, units: Units) -> Self {
        Self {
            id: None,
            order_type,
            instrument: Some(instrument),
            units: Some(units),
            price: None,
            time_in_force: None,
            gtd_time: None,
            create_time: None,
            state: None,
            partial_fill: None,
            position_fill: None,
            trigger_condition: None,
            replaces_order_id: None,
            client_extensions: None,
            take_profit_on_fill: None,
            stop_loss_on_fill: None,
            trailing_stop_loss_on_fill: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<OrderId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    /// Sets a good-till-date lifetime
    pub fn good_till(mut self, gtd_time: DateTime<Utc>) -> Self {
        self.time_in_force = Some(TimeInForce::Gtd);
        self.gtd_time = Some(gtd_time);
        self
    }

    pub fn with_position_fill(mut self, position_fill: impl Into<String>) -> Self {
        self.position_fill = Some(position_fill.into());
        self
    }

    pub fn with_take_profit(mut self, price: Price) -> Self {
        self.take_profit_on_fill = Some(OnFill {
            price,
            time_in_force: Some(TimeInForce::Gtc),
        });
        self
    }

    pub fn with_stop_loss(mut self, price: Price) -> Self {
        self.stop_loss_on_fill = Some(OnFill {
            price,
            time_in_force: Some(TimeInForce::Gtc),
        });
        self
    }

    pub fn with_trailing_stop_loss(mut self, distance: Price) -> Self {
        self.trailing_stop_loss_on_fill = Some(TrailingOnFill {
            distance,
            time_in_force: Some(TimeInForce::Gtc),
        });
        self
    }

    /// Encodes the order as a create/update request body
    ///
    /// # Errors
    /// Returns `InvalidRequest` when the instrument or units are missing.
    pub fn to_request(&self) -> Result<OrderRequest> {
        let instrument = self
            .instrument
            .as_ref()
            .ok_or_else(|| OandaError::InvalidRequest("order has no instrument".to_string()))?;
        let units = self
            .units
            .ok_or_else(|| OandaError::InvalidRequest("order has no units".to_string()))?;

        Ok(OrderRequest {
            order: OrderRequestBody {
                order_type: self.order_type.to_string(),
                instrument: instrument.to_string(),
                units: units.to_wire(),
                price: self.price.map(|p| p.to_wire()),
                time_in_force: self.time_in_force.as_ref().map(|t| t.to_string()),
                gtd_time: self.gtd_time.map(format_time),
                position_fill: self.position_fill.clone(),
                trigger_condition: self.trigger_condition.clone(),
                client_extensions: self.client_extensions.as_ref().map(|c| ClientExtensionsWire {
                    id: c.id.clone(),
                    tag: c.tag.clone(),
                    comment: c.comment.clone(),
                }),
                take_profit_on_fill: self.take_profit_on_fill.as_ref().map(OnFill::to_wire),
                stop_loss_on_fill: self.stop_loss_on_fill.as_ref().map(OnFill::to_wire),
                trailing_stop_loss_on_fill: self
                    .trailing_stop_loss_on_fill
                    .as_ref()
                    .map(TrailingOnFill::to_wire),
            },
        })
    }
}

impl OnFill {
    fn decode(field: &str, wire: OnFillWire) -> Result<Self> {
        Ok(Self {
            price: Price::parse(&format!("{}.price", field), &wire.price)?,
            time_in_force: wire.time_in_force.map(TimeInForce::from),
        })
    }

    fn to_wire(&self) -> OnFillWire {
        OnFillWire {
            price: self.price.to_wire(),
            time_in_force: self.time_in_force.as_ref().map(|t| t.to_string()),
        }
    }
}

impl TrailingOnFill {
    fn decode(wire: TrailingOnFillWire) -> Result<Self> {
        Ok(Self {
            distance: Price::parse("trailingStopLossOnFill.distance", &wire.distance)?,
            time_in_force: wire.time_in_force.map(TimeInForce::from),
        })
    }

    fn to_wire(&self) -> TrailingOnFillWire {
        TrailingOnFillWire {
            distance: self.distance.to_wire(),
            time_in_force: self.time_in_force.as_ref().map(|t| t.to_string()),
        }
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl TryFrom<OrderWire> for Order {
    type Error = OandaError;

    fn try_from(wire: OrderWire) -> Result<Self> {
        Ok(Self {
            units: wire
                .units
                .as_deref()
                .map(|u| Units::parse("units", u))
                .transpose()?,
            price: wire
                .price
                .as_deref()
                .map(|p| Price::parse("price", p))
                .transpose()?,
            gtd_time: wire
                .gtd_time
                .as_deref()
                .map(|t| parse_time("gtdTime", t))
                .transpose()?,
            create_time: wire
                .create_time
                .as_deref()
                .map(|t| parse_time("createTime", t))
                .transpose()?,
            take_profit_on_fill: wire
                .take_profit_on_fill
                .map(|w| OnFill::decode("takeProfitOnFill", w))
                .transpose()?,
            stop_loss_on_fill: wire
                .stop_loss_on_fill
                .map(|w| OnFill::decode("stopLossOnFill", w))
                .transpose()?,
            trailing_stop_loss_on_fill: wire
                .trailing_stop_loss_on_fill
                .map(TrailingOnFill::decode)
                .transpose()?,
            id: Some(OrderId(wire.id)),
            order_type: OrderType::from(wire.order_type),
            instrument: wire.instrument.map(Instrument::from),
            time_in_force: wire.time_in_force.map(TimeInForce::from),
            state: wire.state,
            partial_fill: wire.partial_fill,
            position_fill: wire.position_fill,
            trigger_condition: wire.trigger_condition,
            replaces_order_id: wire.replaces_order_id.map(OrderId),
            client_extensions: wire.client_extensions.map(|c| ClientExtensions {
                id: c.id,
                tag: c.tag,
                comment: c.comment,
            }),
        })
    }
}

/// Converts every order of a response, failing on the first malformed one
pub fn decode_orders(wires: Vec<OrderWire>) -> Result<Vec<Order>> {
    wires.into_iter().map(Order::try_from).collect()
}
