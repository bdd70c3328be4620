//! API Credential Management
//!
//! OANDA credentials are an account id and a personal access token. The token
//! is never logged at INFO/WARN levels and is masked when displayed.

use crate::config::client::Environment;
use crate::config::params::{self, Param, ParameterStore};
use crate::error::{OandaError, Result};
use crate::model::AccountId;
use std::fmt;

/// Secure string wrapper that masks sensitive data in logs
///
/// Debug output shows only `SecretString(***)` and Display shows the
/// truncated form `first4...last4`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: String) -> Self {
        SecretString(value)
    }

    /// Returns a reference to the inner string
    ///
    /// **Security Warning**: Only use this when building the Authorization header.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Format: `first4...last4` (e.g., "abcd...wxyz")
    pub fn masked(&self) -> String {
        let s = &self.0;
        if s.len() <= 8 || !s.is_ascii() {
            return "***".to_string();
        }
        format!("{}...{}", &s[..4], &s[s.len() - 4..])
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString(***)")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        SecretString::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        SecretString::new(s.to_string())
    }
}

/// OANDA API credentials
#[derive(Clone, Debug)]
pub struct Credentials {
    /// Account that order and trade operations act on
    pub account_id: AccountId,
    /// Personal access token sent as a bearer token
    pub api_key: SecretString,
}

impl Credentials {
    pub fn new(account_id: impl Into<AccountId>, api_key: impl Into<SecretString>) -> Self {
        Self {
            account_id: account_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Loads credentials from `OANDA_ACCOUNT_ID` and `OANDA_API_KEY`
    ///
    /// Trims whitespace and rejects empty values.
    pub fn from_env() -> Result<Self> {
        let account_id = required_env("OANDA_ACCOUNT_ID")?;
        let api_key = required_env("OANDA_API_KEY")?;
        Ok(Self::new(account_id, api_key))
    }

    /// Loads credentials from the `AccountID` and `APIKey` parameters of `environment`
    pub async fn from_parameter_store(environment: Environment) -> Result<Self> {
        let store = params::shared_parameter_store();
        Self::from_store(store.as_ref(), environment).await
    }

    pub async fn from_store(store: &dyn ParameterStore, environment: Environment) -> Result<Self> {
        let account_id = Param::ACCOUNT_ID.fetch_from(store, environment).await?;
        let api_key = Param::API_KEY.fetch_from(store, environment).await?;
        Ok(Self::new(account_id, api_key))
    }
}

fn required_env(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .map_err(|_| OandaError::Configuration(format!("{} not set", name)))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(OandaError::Configuration(format!(
            "{} is empty after trimming whitespace",
            name
        )));
    }
    Ok(value)
}
