//! OANDA v3 wire types
//!
//! Serde representations of request and response bodies. Decimal values are
//! kept as the strings the API sends; conversion into domain values happens in
//! `crate::model`.

use serde::{Deserialize, Serialize};

/// Response from `GET /v3/accounts`
///
/// # Example Response
/// ```json
/// { "accounts": [ { "id": "101-004-1234567-001", "tags": [] } ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<AccountPropertiesWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountPropertiesWire {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Response from `GET /v3/accounts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account: AccountWire,
    #[serde(rename = "lastTransactionID", default)]
    pub last_transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountWire {
    pub id: String,
    #[serde(default)]
    pub alias: Option<String>,
    pub currency: String,
    pub balance: String,
    #[serde(rename = "pl", default)]
    pub pl: Option<String>,
    #[serde(rename = "unrealizedPL", default)]
    pub unrealized_pl: Option<String>,
    #[serde(default)]
    pub margin_used: Option<String>,
    #[serde(default)]
    pub margin_available: Option<String>,
    #[serde(default)]
    pub margin_rate: Option<String>,
    #[serde(default)]
    pub open_trade_count: i64,
    #[serde(default)]
    pub open_position_count: i64,
    #[serde(default)]
    pub pending_order_count: i64,
}

/// Response from `GET /v3/accounts/{id}/orders`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<OrderWire>,
    #[serde(rename = "lastTransactionID", default)]
    pub last_transaction_id: Option<String>,
}

/// Response from `GET /v3/accounts/{id}/orders/{orderId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: OrderWire,
    #[serde(rename = "lastTransactionID", default)]
    pub last_transaction_id: Option<String>,
}

/// Order as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWire {
    pub id: String,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(default)]
    pub instrument: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub time_in_force: Option<String>,
    #[serde(default)]
    pub gtd_time: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub partial_fill: Option<String>,
    #[serde(default)]
    pub position_fill: Option<String>,
    #[serde(default)]
    pub trigger_condition: Option<String>,
    #[serde(rename = "replacesOrderID", default)]
    pub replaces_order_id: Option<String>,
    #[serde(default)]
    pub client_extensions: Option<ClientExtensionsWire>,
    #[serde(default)]
    pub take_profit_on_fill: Option<OnFillWire>,
    #[serde(default)]
    pub stop_loss_on_fill: Option<OnFillWire>,
    #[serde(default)]
    pub trailing_stop_loss_on_fill: Option<TrailingOnFillWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientExtensionsWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnFillWire {
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailingOnFillWire {
    pub distance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>,
}

/// Body of `POST /orders` and `PUT /orders/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub order: OrderRequestBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequestBody {
    #[serde(rename = "type")]
    pub order_type: String,
    pub instrument: String,
    pub units: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtd_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_extensions: Option<ClientExtensionsWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit_on_fill: Option<OnFillWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_on_fill: Option<OnFillWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_stop_loss_on_fill: Option<TrailingOnFillWire>,
}

/// Response from `GET /v3/accounts/{id}/openTrades`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradesResponse {
    #[serde(default)]
    pub trades: Vec<TradeWire>,
    #[serde(rename = "lastTransactionID", default)]
    pub last_transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeWire {
    pub id: String,
    pub instrument: String,
    pub price: String,
    pub open_time: String,
    #[serde(default)]
    pub state: Option<String>,
    pub initial_units: String,
    pub current_units: String,
    #[serde(rename = "realizedPL", default)]
    pub realized_pl: Option<String>,
    #[serde(rename = "unrealizedPL", default)]
    pub unrealized_pl: Option<String>,
    #[serde(default)]
    pub financing: Option<String>,
}

/// Body of `PUT /trades/{id}/close`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseTradeRequest {
    pub units: String,
}

impl CloseTradeRequest {
    pub fn all() -> Self {
        Self {
            units: "ALL".to_string(),
        }
    }
}

/// Response from `GET /v3/instruments/{instrument}/orderBook`
///
/// # Example Response
/// ```json
/// {
///   "orderBook": {
///     "instrument": "USD_JPY",
///     "time": "2024-03-01T12:00:00Z",
///     "price": "150.120",
///     "bucketWidth": "0.050",
///     "buckets": [
///       { "price": "150.100", "longCountPercent": "0.31", "shortCountPercent": "0.22" }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookResponse {
    pub order_book: OrderBookWire,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookWire {
    pub instrument: String,
    pub time: String,
    pub price: String,
    #[serde(default)]
    pub bucket_width: Option<String>,
    #[serde(default)]
    pub buckets: Vec<BucketWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketWire {
    pub price: String,
    pub long_count_percent: String,
    pub short_count_percent: String,
}
