//! Global error types for the Arifzyn client.
//!
//! Transport, response, catalog, and configuration failures are unified into
//! a single `AzError` enum with conversions from underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using AzError.
pub type AzResult<T> = Result<T, AzError>;

/// Unified error type for the client.
#[derive(Error, Debug)]
pub enum AzError {
    // -- Configuration errors --
    /// Failed to load, parse, or validate configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Transport errors --
    /// The HTTP request failed: network error, timeout, or non-2xx status.
    #[error("api request failed: {0}")]
    ApiRequest(String),

    // -- Response errors --
    /// A response declared as JSON could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A response decoded fine but did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    UnexpectedResponseShape(String),

    // -- Dispatch errors --
    /// No catalog entry has the requested path.
    #[error("feature with path {0} does not exist")]
    FeatureNotFound(String),

    /// The endpoint declares a method the facade cannot dispatch.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error outside the response path.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AzError {
    /// Whether this error came from the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, AzError::ApiRequest(_))
    }
}

impl From<serde_json::Error> for AzError {
    fn from(e: serde_json::Error) -> Self {
        AzError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for AzError {
    fn from(e: toml::de::Error) -> Self {
        AzError::Config(e.to_string())
    }
}
