use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the OANDA client
#[derive(Error, Debug)]
pub enum OandaError {
    #[error("{operation}: transport error: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("{operation}: HTTP {status}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{}Failed to decode `{field}`: {message}", operation_prefix(.operation))]
    Decode {
        /// Set once the error leaves the client operation that decoded the body
        operation: Option<&'static str>,
        field: String,
        message: String,
    },

    #[error("Price is too low: {requested} lower buckets requested, {available} available")]
    InsufficientLowerBuckets { requested: usize, available: usize },

    #[error("Price is too high: {requested} higher buckets requested, {available} available")]
    InsufficientHigherBuckets { requested: usize, available: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl OandaError {
    /// Decode failure for a wire field that held an unparseable value
    pub fn malformed(
        field: impl Into<String>,
        value: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        OandaError::Decode {
            operation: None,
            field: field.into(),
            message: format!("invalid value {:?}: {}", value, reason),
        }
    }

    /// Tags a decode error with the client operation it came from
    ///
    /// Other variants already carry their operation and pass through unchanged.
    pub fn in_operation(self, operation: &'static str) -> Self {
        match self {
            OandaError::Decode {
                operation: None,
                field,
                message,
            } => OandaError::Decode {
                operation: Some(operation),
                field,
                message,
            },
            other => other,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            OandaError::Transport { .. } => "transport_error",
            OandaError::UnexpectedStatus { .. } => "unexpected_status",
            OandaError::Decode { .. } => "decode_error",
            OandaError::InsufficientLowerBuckets { .. } => "insufficient_lower_buckets",
            OandaError::InsufficientHigherBuckets { .. } => "insufficient_higher_buckets",
            OandaError::Configuration(_) => "configuration_error",
            OandaError::InvalidRequest(_) => "invalid_request",
        }
    }

    /// HTTP status carried by an `UnexpectedStatus` error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            OandaError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OandaError {
    fn from(err: serde_json::Error) -> Self {
        OandaError::Decode {
            operation: None,
            field: "body".to_string(),
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

fn operation_prefix(operation: &Option<&'static str>) -> String {
    operation.map(|op| format!("{}: ", op)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, OandaError>;
