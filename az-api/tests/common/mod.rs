//! Shared test utilities for integration tests.

#![allow(dead_code)]

use az_api::{ApiClient, FeatureClient, Params};
use az_core::config::{AuthScheme, ClientConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_KEY: &str = "test-api-key";

/// Build a catalog descriptor as the server would send it.
pub fn descriptor(category: &str, path: &str, http_method: &str) -> Value {
    json!({
        "category": category,
        "base_code": category,
        "name": path.rsplit('/').next().unwrap_or(path),
        "path": path,
        "example": {},
        "parameters": [],
        "method": http_method,
        "uri": path,
        "files": false,
        "error": false
    })
}

/// Wrap a result value in the standard envelope.
pub fn envelope(result: Value) -> Value {
    json!({ "creator": "Arifzyn", "status": 200, "result": result })
}

/// A small catalog: 5 descriptors across 2 categories.
pub fn sample_catalog() -> Vec<Value> {
    vec![
        descriptor("ai", "/ai/chatgpt", "GET"),
        descriptor("download", "/download/tiktok", "GET"),
        descriptor("ai", "/ai/animediff", "POST"),
        descriptor("download", "/download/ytmp3", "get"),
        descriptor("ai", "/ai/remini", "PUT"),
    ]
}

/// Mount `GET /endpoint` returning `descriptors`, expected to be hit `times` times.
pub async fn mount_catalog(server: &MockServer, descriptors: Vec<Value>, times: u64) {
    Mock::given(method("GET"))
        .and(path("/endpoint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(Value::Array(descriptors))))
        .expect(times)
        .mount(server)
        .await;
}

/// Client config pointed at the mock server.
pub fn config_for(server: &MockServer, scheme: AuthScheme) -> ClientConfig {
    ClientConfig::with_api_key(TEST_KEY, scheme, Some(&server.uri()))
}

pub fn api_for(server: &MockServer, scheme: AuthScheme) -> ApiClient {
    ApiClient::new(&config_for(server, scheme)).expect("failed to build api client")
}

pub fn feature_client_for(server: &MockServer, scheme: AuthScheme) -> FeatureClient {
    FeatureClient::new(&config_for(server, scheme)).expect("failed to build feature client")
}

/// Build params from a JSON object literal.
pub fn params(value: Value) -> Params {
    value.as_object().cloned().expect("params must be a JSON object")
}
