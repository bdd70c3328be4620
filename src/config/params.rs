//! Remote parameter store access
//!
//! Parameters are addressed by environment-scoped paths such as
//! `/Oanda/Practice/APIKey`. A single store handle is shared by the whole
//! process and initialised on first use.

use crate::config::client::Environment;
use crate::error::{OandaError, Result};
use crate::model::{Instrument, Units};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::debug;

const ENV_PLACEHOLDER: &str = "<ENV>";

/// Parameter store errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("Parameter not found: {0}")]
    NotFound(String),

    #[error("Access denied to parameter: {0}")]
    AccessDenied(String),
}

/// Source of named secret values
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn fetch(&self, name: &str) -> std::result::Result<String, ParamError>;
}

/// Reads parameters from process environment variables
///
/// `/Oanda/Practice/APIKey` is looked up as `OANDA_PRACTICE_APIKEY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvParameterStore;

impl EnvParameterStore {
    pub fn variable_name(name: &str) -> String {
        name.trim_start_matches('/')
            .replace(['/', '-'], "_")
            .to_uppercase()
    }
}

#[async_trait]
impl ParameterStore for EnvParameterStore {
    async fn fetch(&self, name: &str) -> std::result::Result<String, ParamError> {
        let variable = Self::variable_name(name);
        match std::env::var(&variable) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(ParamError::NotFound(format!("{} (env {})", name, variable))),
        }
    }
}

/// In-memory parameter store
#[derive(Debug, Clone, Default)]
pub struct MemoryParameterStore {
    values: HashMap<String, String>,
    denied: HashSet<String>,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Marks a parameter as present but unreadable
    pub fn deny(mut self, name: impl Into<String>) -> Self {
        self.denied.insert(name.into());
        self
    }
}

#[async_trait]
impl ParameterStore for MemoryParameterStore {
    async fn fetch(&self, name: &str) -> std::result::Result<String, ParamError> {
        if self.denied.contains(name) {
            return Err(ParamError::AccessDenied(name.to_string()));
        }
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| ParamError::NotFound(name.to_string()))
    }
}

static SHARED_STORE: OnceLock<Arc<dyn ParameterStore>> = OnceLock::new();

/// Installs the process-wide store
///
/// Returns `false` if a store was already installed or used.
pub fn install_parameter_store(store: Arc<dyn ParameterStore>) -> bool {
    SHARED_STORE.set(store).is_ok()
}

/// Returns the process-wide store, defaulting to `EnvParameterStore`
pub fn shared_parameter_store() -> Arc<dyn ParameterStore> {
    SHARED_STORE
        .get_or_init(|| Arc::new(EnvParameterStore))
        .clone()
}

/// Environment-scoped parameter path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param(&'static str);

impl Param {
    pub const API_KEY: Param = Param("/Oanda/<ENV>/APIKey");
    pub const ACCOUNT_ID: Param = Param("/Oanda/<ENV>/AccountID");
    pub const USD_JPY_UNITS: Param = Param("/Oanda/<ENV>/Units/USD_JPY");
    pub const EUR_USD_UNITS: Param = Param("/Oanda/<ENV>/Units/EUR_USD");
    pub const EUR_JPY_UNITS: Param = Param("/Oanda/<ENV>/Units/EUR_JPY");

    /// Default trade size parameter for `instrument`
    pub fn units_for(instrument: &Instrument) -> Option<Param> {
        match instrument {
            Instrument::UsdJpy => Some(Param::USD_JPY_UNITS),
            Instrument::EurUsd => Some(Param::EUR_USD_UNITS),
            Instrument::EurJpy => Some(Param::EUR_JPY_UNITS),
            Instrument::Other(_) => None,
        }
    }

    pub fn template(&self) -> &'static str {
        self.0
    }

    pub fn resolve(&self, environment: Environment) -> String {
        self.0.replacen(ENV_PLACEHOLDER, environment.as_str(), 1)
    }

    /// Fetches the value from the shared store
    pub async fn fetch_value(&self, environment: Environment) -> Result<String> {
        let store = shared_parameter_store();
        self.fetch_from(store.as_ref(), environment).await
    }

    pub async fn fetch_from(
        &self,
        store: &dyn ParameterStore,
        environment: Environment,
    ) -> Result<String> {
        let resolved = self.resolve(environment);
        debug!(parameter = %resolved, "Fetching parameter");
        store.fetch(&resolved).await.map_err(|e| {
            OandaError::Configuration(format!("failed to get parameter (key={}): {}", resolved, e))
        })
    }
}

/// Fetches the configured default trade size for `instrument`
pub async fn fetch_units(
    store: &dyn ParameterStore,
    environment: Environment,
    instrument: &Instrument,
) -> Result<Units> {
    let param = Param::units_for(instrument).ok_or_else(|| {
        OandaError::Configuration(format!("no units parameter for {}", instrument))
    })?;
    let raw = param.fetch_from(store, environment).await?;
    Units::parse(&param.resolve(environment), &raw)
        .map_err(|e| OandaError::Configuration(e.to_string()))
}
