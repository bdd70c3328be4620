//! Client Configuration
//!
//! Endpoint, credentials and transport settings for `OandaClient`.

use crate::config::credentials::Credentials;
use crate::config::params::ParameterStore;
use crate::error::{OandaError, Result};
use std::fmt;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = concat!("oanda-client/", env!("CARGO_PKG_VERSION"));

/// OANDA deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// fxTrade Practice (demo accounts)
    #[default]
    Practice,
    /// fxTrade (live accounts)
    Trade,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Practice => "Practice",
            Environment::Trade => "Trade",
        }
    }

    /// REST API base URL for this environment
    pub fn rest_base_url(&self) -> &'static str {
        match self {
            Environment::Trade => "https://api-fxtrade.oanda.com",
            Environment::Practice => "https://api-fxpractice.oanda.com",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "practice" | "demo" => Some(Environment::Practice),
            "trade" | "live" => Some(Environment::Trade),
            _ => None,
        }
    }

    /// Reads `OANDA_ENVIRONMENT`, falling back to `ENVIRONMENT`
    ///
    /// # Errors
    /// Returns `Configuration` if neither is set or the value is unknown.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var("OANDA_ENVIRONMENT")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .map_err(|_| {
                OandaError::Configuration("OANDA_ENVIRONMENT or ENVIRONMENT not set".to_string())
            })?;
        Self::parse(&raw).ok_or_else(|| {
            OandaError::Configuration(format!(
                "unknown environment {:?} (expected Practice or Trade)",
                raw
            ))
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OANDA client configuration
///
/// ## Environment Variables
///
/// - `OANDA_ENVIRONMENT` / `ENVIRONMENT`: `Practice` or `Trade` (default: Practice)
/// - `OANDA_ACCOUNT_ID`: account to operate on (required)
/// - `OANDA_API_KEY`: personal access token (required)
/// - `OANDA_BASE_URL`: overrides the environment's REST URL
/// - `OANDA_TIMEOUT_SECS`: request timeout in seconds (default: 10)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,

    /// REST API root, without the `/v3` prefix
    pub base_url: String,

    pub credentials: Credentials,

    pub timeout: Duration,

    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(environment: Environment, credentials: Credentials) -> Self {
        Self {
            environment,
            base_url: environment.rest_base_url().to_string(),
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if credentials are missing or invalid values are provided
    pub fn from_env() -> Result<Self> {
        let environment_set =
            std::env::var("OANDA_ENVIRONMENT").is_ok() || std::env::var("ENVIRONMENT").is_ok();
        let environment = if environment_set {
            Environment::from_env()?
        } else {
            Environment::default()
        };

        let mut config = Self::new(environment, Credentials::from_env()?);

        if let Ok(base_url) = std::env::var("OANDA_BASE_URL") {
            if !base_url.trim().is_empty() {
                config = config.with_base_url(base_url.trim());
            }
        }

        if let Ok(raw) = std::env::var("OANDA_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                OandaError::Configuration(format!("OANDA_TIMEOUT_SECS is not a number: {:?}", raw))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Load credentials for `environment` from the shared parameter store
    pub async fn from_parameter_store(environment: Environment) -> Result<Self> {
        let credentials = Credentials::from_parameter_store(environment).await?;
        Ok(Self::new(environment, credentials))
    }

    pub async fn from_store(store: &dyn ParameterStore, environment: Environment) -> Result<Self> {
        let credentials = Credentials::from_store(store, environment).await?;
        Ok(Self::new(environment, credentials))
    }
}
