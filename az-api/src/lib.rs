//! Arifzyn API - HTTP client for the Arifzyn feature API.
//!
//! The server publishes a catalog of feature endpoints (AI generation,
//! downloaders, and so on) at `/endpoint`. This crate fetches that catalog,
//! dispatches feature calls by path or explicit method, and normalizes every
//! response into either a JSON envelope or raw bytes based on its
//! `content-type`.

pub mod client;
pub mod endpoints;
pub mod feature;
pub mod method;
pub mod response;

// Re-export key types
pub use client::{ApiClient, Params, RequestOptions};
pub use endpoints::catalog::{CatalogIndex, EndpointDescriptor};
pub use feature::FeatureClient;
pub use method::HttpMethod;
pub use response::{normalize, ApiResponse, NormalizedResponse, RawResponse};
