//! OANDA v3 endpoint table
//!
//! One descriptor per operation: method, path template, the single status
//! code that counts as success, and whether RFC3339 timestamps are requested.

use crate::error::{OandaError, Result};
use reqwest::{Method, StatusCode, Url};

#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Operation name used in logs and errors
    pub operation: &'static str,
    pub method: Method,
    /// Path with `{name}` placeholders
    pub template: &'static str,
    pub expected_status: StatusCode,
    /// Send `Accept-Datetime-Format: RFC3339`
    pub rfc3339_times: bool,
}

impl Endpoint {
    /// Builds the request URL under `base_url`
    ///
    /// Every `{name}` placeholder becomes exactly one path segment. Values are
    /// percent-encoded, so `/`, `?` and `#` inside an id stay inside it.
    ///
    /// # Errors
    /// * `InvalidRequest` - a placeholder has no value, or the value is empty,
    ///   `.` or `..`
    /// * `Configuration` - `base_url` is not an absolute hierarchical URL
    pub fn url(&self, base_url: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(base_url).map_err(|e| {
            OandaError::Configuration(format!("invalid base URL {:?}: {}", base_url, e))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                OandaError::Configuration(format!("base URL {:?} cannot carry a path", base_url))
            })?;
            segments.pop_if_empty();
            for part in self.template.split('/').filter(|p| !p.is_empty()) {
                segments.push(self.segment(part, params)?);
            }
        }
        Ok(url)
    }

    fn segment<'a>(&self, part: &'a str, params: &[(&str, &'a str)]) -> Result<&'a str> {
        let name = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(name) => name,
            None => return Ok(part),
        };
        let value = params
            .iter()
            .find(|(param, _)| *param == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| {
                OandaError::InvalidRequest(format!(
                    "{}: missing path parameter `{}`",
                    self.operation, name
                ))
            })?;
        if matches!(value, "" | "." | "..") {
            return Err(OandaError::InvalidRequest(format!(
                "{}: `{}` cannot be {:?}",
                self.operation, name, value
            )));
        }
        Ok(value)
    }
}

pub const LIST_ACCOUNTS: Endpoint = Endpoint {
    operation: "list_accounts",
    method: Method::GET,
    template: "/v3/accounts",
    expected_status: StatusCode::OK,
    rfc3339_times: true,
};

pub const GET_ACCOUNT: Endpoint = Endpoint {
    operation: "get_account",
    method: Method::GET,
    template: "/v3/accounts/{accountId}",
    expected_status: StatusCode::OK,
    rfc3339_times: true,
};

pub const LIST_ORDERS: Endpoint = Endpoint {
    operation: "list_orders",
    method: Method::GET,
    template: "/v3/accounts/{accountId}/orders",
    expected_status: StatusCode::OK,
    rfc3339_times: true,
};

pub const GET_ORDER: Endpoint = Endpoint {
    operation: "get_order",
    method: Method::GET,
    template: "/v3/accounts/{accountId}/orders/{orderId}",
    expected_status: StatusCode::OK,
    rfc3339_times: true,
};

pub const CREATE_ORDER: Endpoint = Endpoint {
    operation: "create_order",
    method: Method::POST,
    template: "/v3/accounts/{accountId}/orders",
    expected_status: StatusCode::CREATED,
    rfc3339_times: true,
};

pub const UPDATE_ORDER: Endpoint = Endpoint {
    operation: "update_order",
    method: Method::PUT,
    template: "/v3/accounts/{accountId}/orders/{orderId}",
    expected_status: StatusCode::CREATED,
    rfc3339_times: true,
};

pub const CANCEL_ORDER: Endpoint = Endpoint {
    operation: "cancel_order",
    method: Method::PUT,
    template: "/v3/accounts/{accountId}/orders/{orderId}/cancel",
    expected_status: StatusCode::OK,
    rfc3339_times: true,
};

pub const LIST_OPEN_TRADES: Endpoint = Endpoint {
    operation: "list_open_trades",
    method: Method::GET,
    template: "/v3/accounts/{accountId}/openTrades",
    expected_status: StatusCode::OK,
    rfc3339_times: true,
};

pub const CLOSE_TRADE: Endpoint = Endpoint {
    operation: "close_trade",
    method: Method::PUT,
    template: "/v3/accounts/{accountId}/trades/{tradeId}/close",
    expected_status: StatusCode::OK,
    rfc3339_times: false,
};

pub const GET_ORDER_BOOK: Endpoint = Endpoint {
    operation: "get_order_book",
    method: Method::GET,
    template: "/v3/instruments/{instrument}/orderBook",
    expected_status: StatusCode::OK,
    rfc3339_times: true,
};
