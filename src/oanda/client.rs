//! OANDA HTTP Client
//!
//! Client for the OANDA v3 REST API. Each operation issues exactly one
//! request (account name lookups issue one per account), checks for the
//! operation's expected status code and decodes the body into domain types.
//! Nothing is retried.

use crate::config::{ClientConfig, Environment, SecretString};
use crate::error::{OandaError, Result};
use crate::model::order::decode_orders;
use crate::model::trade::decode_trades;
use crate::model::{
    Account, AccountId, AccountProperties, Instrument, Order, OrderBook, OrderId, Trade, TradeId,
};
use crate::oanda::endpoints::{self, Endpoint};
use crate::oanda::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::oanda::types::{
    AccountResponse, AccountsResponse, CloseTradeRequest, OrderBookResponse, OrderResponse,
    OrdersResponse, TradesResponse,
};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

const AUTHORIZATION_PREFIX: &str = "Bearer ";
const ACCEPT_DATETIME_FORMAT: &str = "Accept-Datetime-Format";

/// OANDA REST API client
///
/// Cheap to clone; clones share the underlying transport.
#[derive(Clone)]
pub struct OandaClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    account_id: AccountId,
    api_key: SecretString,
}

impl std::fmt::Debug for OandaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OandaClient")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("api_key", &"***")
            .finish()
    }
}

impl OandaClient {
    /// Creates a client backed by `reqwest`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout, &config.user_agent)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client over a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: config.base_url,
            account_id: config.credentials.account_id,
            api_key: config.credentials.api_key,
        }
    }

    /// Creates a client from `OANDA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Creates a client with credentials read from the shared parameter store
    pub async fn from_parameter_store(environment: Environment) -> Result<Self> {
        Self::new(ClientConfig::from_parameter_store(environment).await?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    fn headers(&self, endpoint: &Endpoint) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut authorization = HeaderValue::from_str(&format!(
            "{}{}",
            AUTHORIZATION_PREFIX,
            self.api_key.expose_secret()
        ))
        .map_err(|_| {
            OandaError::Configuration("API key contains invalid header characters".to_string())
        })?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if endpoint.rfc3339_times {
            headers.insert(ACCEPT_DATETIME_FORMAT, HeaderValue::from_static("RFC3339"));
        }
        Ok(headers)
    }

    /// Sends one request and returns the body if the status matches
    ///
    /// `params` fill the endpoint's path placeholders; each value is encoded
    /// as a single path segment.
    async fn execute(
        &self,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
        query: Option<String>,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>> {
        let mut url = endpoint.url(&self.base_url, params)?;
        if let Some(query) = query {
            url.set_query(Some(&query));
        }

        debug!(
            operation = endpoint.operation,
            method = %endpoint.method,
            url = %url,
            "Sending OANDA request"
        );

        let request = HttpRequest {
            method: endpoint.method.clone(),
            url: url.into(),
            headers: self.headers(endpoint)?,
            body,
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| OandaError::Transport {
                operation: endpoint.operation,
                message: e.to_string(),
            })?;

        if response.status != endpoint.expected_status {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            warn!(
                operation = endpoint.operation,
                status = %response.status,
                expected = %endpoint.expected_status,
                "Unexpected response status"
            );
            return Err(OandaError::UnexpectedStatus {
                operation: endpoint.operation,
                status: response.status,
                body,
            });
        }

        debug!(
            operation = endpoint.operation,
            bytes = response.body.len(),
            "Received OANDA response"
        );
        Ok(response.body)
    }

    /// Lists accounts accessible with the configured token
    ///
    /// Calls GET /v3/accounts
    pub async fn list_accounts(&self) -> Result<Vec<AccountProperties>> {
        let endpoint = &endpoints::LIST_ACCOUNTS;
        let body = self.execute(endpoint, &[], None, None).await?;
        let response: AccountsResponse = decode(endpoint.operation, &body)?;
        Ok(response
            .accounts
            .into_iter()
            .map(AccountProperties::from)
            .collect())
    }

    /// Get account summary
    ///
    /// Calls GET /v3/accounts/{accountId}
    pub async fn get_account(&self, account_id: &AccountId) -> Result<Account> {
        let endpoint = &endpoints::GET_ACCOUNT;
        let params = [("accountId", account_id.as_str())];
        let body = self.execute(endpoint, &params, None, None).await?;
        let response: AccountResponse = decode(endpoint.operation, &body)?;
        Account::try_from(response.account).map_err(|e| e.in_operation(endpoint.operation))
    }

    /// Lists the alias of every account, falling back to the id when unset
    pub async fn list_account_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for properties in self.list_accounts().await? {
            let account = self.get_account(&properties.id).await?;
            names.push(account.alias.unwrap_or_else(|| account.id.to_string()));
        }
        Ok(names)
    }

    /// Finds the id of the account whose alias is `name`
    ///
    /// Returns `Ok(None)` if no account matches.
    pub async fn find_account_id(&self, name: &str) -> Result<Option<AccountId>> {
        for properties in self.list_accounts().await? {
            let account = self.get_account(&properties.id).await?;
            if account.alias.as_deref() == Some(name) {
                return Ok(Some(account.id));
            }
        }
        Ok(None)
    }

    /// Raw body of the pending order list
    ///
    /// Calls GET /v3/accounts/{accountId}/orders
    pub async fn list_orders_json(&self) -> Result<Vec<u8>> {
        let params = [("accountId", self.account_id.as_str())];
        self.execute(&endpoints::LIST_ORDERS, &params, None, None)
            .await
    }

    /// Lists pending orders of the configured account
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let operation = endpoints::LIST_ORDERS.operation;
        let body = self.list_orders_json().await?;
        let response: OrdersResponse = decode(operation, &body)?;
        decode_orders(response.orders).map_err(|e| e.in_operation(operation))
    }

    /// Get a single order
    ///
    /// Calls GET /v3/accounts/{accountId}/orders/{orderId}
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order> {
        let endpoint = &endpoints::GET_ORDER;
        let params = [
            ("accountId", self.account_id.as_str()),
            ("orderId", order_id.as_str()),
        ];
        let body = self.execute(endpoint, &params, None, None).await?;
        let response: OrderResponse = decode(endpoint.operation, &body)?;
        Order::try_from(response.order).map_err(|e| e.in_operation(endpoint.operation))
    }

    /// Submits a new order
    ///
    /// Calls POST /v3/accounts/{accountId}/orders
    pub async fn create_order(&self, order: &Order) -> Result<()> {
        let body = encode(&order.to_request()?)?;
        let params = [("accountId", self.account_id.as_str())];
        self.execute(&endpoints::CREATE_ORDER, &params, None, Some(body))
            .await?;
        Ok(())
    }

    /// Replaces an existing order
    ///
    /// Calls PUT /v3/accounts/{accountId}/orders/{orderId}
    ///
    /// # Errors
    /// Returns `InvalidRequest` when the order has no id.
    pub async fn update_order(&self, order: &Order) -> Result<()> {
        let order_id = order
            .id
            .as_ref()
            .ok_or_else(|| OandaError::InvalidRequest("order to update has no id".to_string()))?;
        let body = encode(&order.to_request()?)?;
        let params = [
            ("accountId", self.account_id.as_str()),
            ("orderId", order_id.as_str()),
        ];
        self.execute(&endpoints::UPDATE_ORDER, &params, None, Some(body))
            .await?;
        Ok(())
    }

    /// Cancels a pending order
    ///
    /// Calls PUT /v3/accounts/{accountId}/orders/{orderId}/cancel
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<()> {
        let params = [
            ("accountId", self.account_id.as_str()),
            ("orderId", order_id.as_str()),
        ];
        self.execute(&endpoints::CANCEL_ORDER, &params, None, None)
            .await?;
        Ok(())
    }

    /// Raw body of the open trade list
    ///
    /// Calls GET /v3/accounts/{accountId}/openTrades
    pub async fn list_open_trades_json(&self) -> Result<Vec<u8>> {
        let params = [("accountId", self.account_id.as_str())];
        self.execute(&endpoints::LIST_OPEN_TRADES, &params, None, None)
            .await
    }

    /// Lists open trades of the configured account
    pub async fn list_open_trades(&self) -> Result<Vec<Trade>> {
        let operation = endpoints::LIST_OPEN_TRADES.operation;
        let body = self.list_open_trades_json().await?;
        let response: TradesResponse = decode(operation, &body)?;
        decode_trades(response.trades).map_err(|e| e.in_operation(operation))
    }

    /// Closes the whole trade
    ///
    /// Calls PUT /v3/accounts/{accountId}/trades/{tradeId}/close with `{"units":"ALL"}`
    pub async fn close_trade(&self, trade_id: &TradeId) -> Result<()> {
        let body = encode(&CloseTradeRequest::all())?;
        let params = [
            ("accountId", self.account_id.as_str()),
            ("tradeId", trade_id.as_str()),
        ];
        self.execute(&endpoints::CLOSE_TRADE, &params, None, Some(body))
            .await?;
        Ok(())
    }

    /// Raw body of an order book snapshot
    ///
    /// Calls GET /v3/instruments/{instrument}/orderBook, adding `?time=` when
    /// a historical snapshot is requested.
    pub async fn get_order_book_json(
        &self,
        instrument: &Instrument,
        time: Option<DateTime<Utc>>,
    ) -> Result<Vec<u8>> {
        let params = [("instrument", instrument.as_str())];
        let query =
            time.map(|t| format!("time={}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        self.execute(&endpoints::GET_ORDER_BOOK, &params, query, None)
            .await
    }

    /// Fetches an order book snapshot
    pub async fn get_order_book(
        &self,
        instrument: &Instrument,
        time: Option<DateTime<Utc>>,
    ) -> Result<OrderBook> {
        let operation = endpoints::GET_ORDER_BOOK.operation;
        let body = self.get_order_book_json(instrument, time).await?;
        let response: OrderBookResponse = decode(operation, &body)?;
        OrderBook::try_from(response.order_book).map_err(|e| e.in_operation(operation))
    }
}

fn decode<T: DeserializeOwned>(operation: &'static str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| OandaError::from(e).in_operation(operation))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        OandaError::InvalidRequest(format!("failed to encode request body: {}", e))
    })
}
