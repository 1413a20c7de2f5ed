//! Arifzyn Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the API client and CLI:
//! - Client configuration (base URL, API key scheme, media detection, timeouts)
//! - A single error enum covering transport, response, and catalog failures
//! - Structured logging with tracing
//! - Config/data directory lookup and common constants

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod platform;

// Re-export commonly used items at the crate root
pub use config::{AppConfig, AuthScheme, BodyEncoding, ClientConfig, Credentials, MediaDetection};
pub use error::{AzError, AzResult};
pub use logging::init_logging;
