//! Transport behavior against a mock server: auth schemes, parameter
//! placement, body encoding, content-type normalization, and error wrapping.

mod common;

use std::time::Duration;

use az_api::{ApiClient, HttpMethod, NormalizedResponse, RequestOptions};
use az_core::config::{AuthScheme, BodyEncoding, ClientConfig, MediaDetection};
use az_core::error::AzError;
use common::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_with_query_apikey() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/pinterest"))
        .and(query_param("q", "cats"))
        .and(query_param("apikey", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(["a", "b"]))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    let resp = api
        .get("/search/pinterest", &params(json!({"q": "cats"})))
        .await
        .unwrap();

    let json = resp.as_json().unwrap();
    assert!(json.is_success());
    assert_eq!(json.result, Some(json!(["a", "b"])));
}

#[tokio::test]
async fn test_header_api_key_scheme() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("x-api-key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"data": "test"}))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::HeaderApiKey);
    api.get("test", &params(json!({}))).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query_pairs().all(|(k, _)| k != "apikey"));
}

#[tokio::test]
async fn test_bearer_scheme() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("authorization", format!("Bearer {TEST_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::HeaderBearer);
    api.get("/test", &params(json!({}))).await.unwrap();
}

#[tokio::test]
async fn test_no_key_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::default()
    };
    let api = ApiClient::new(&config).unwrap();
    api.get("/test", &params(json!({}))).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let req = &requests[0];
    assert!(req.url.query().is_none());
    assert!(!req.headers.contains_key("x-api-key"));
    assert!(!req.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_default_headers_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", "okhttp/4.9.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    api.get("/test", &params(json!({}))).await.unwrap();
}

#[tokio::test]
async fn test_post_json_body_with_query_apikey() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/test"))
        .and(query_param("apikey", TEST_KEY))
        .and(body_json(json!({"key": "value"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"ok": true}))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    let resp = api.post("/test", &params(json!({"key": "value"}))).await.unwrap();
    assert!(resp.is_json());
}

#[tokio::test]
async fn test_post_multipart_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai/animediff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server, AuthScheme::Query);
    config.body_encoding = BodyEncoding::Multipart;
    let api = ApiClient::new(&config).unwrap();
    api.post("/ai/animediff", &params(json!({"prompt": "cute, long hair"})))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let req = &requests[0];
    let content_type = req.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&req.body);
    assert!(body.contains("name=\"prompt\""));
    assert!(body.contains("cute, long hair"));
}

#[tokio::test]
async fn test_body_encoding_override_per_request() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    let options = RequestOptions {
        body_encoding: Some(BodyEncoding::Multipart),
        headers: vec![("x-trace".into(), "abc".into())],
    };
    api.send("/test", HttpMethod::Put, &params(json!({"a": "1"})), &options)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let req = &requests[0];
    assert_eq!(req.headers.get("x-trace").unwrap(), "abc");
    assert!(req
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("multipart/form-data"));
}

#[tokio::test]
async fn test_delete_uses_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/test"))
        .and(query_param("id", "123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::HeaderApiKey);
    api.delete("/test", &params(json!({"id": "123"}))).await.unwrap();
}

#[tokio::test]
async fn test_patch_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/test"))
        .and(body_json(json!({"n": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::HeaderApiKey);
    api.patch("/test", &params(json!({"n": 2}))).await.unwrap();
}

#[tokio::test]
async fn test_binary_response_bytes_unchanged() {
    let server = MockServer::start().await;
    let audio: Vec<u8> = (0u8..=255).collect();
    Mock::given(method("GET"))
        .and(path("/download/ytmp3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(audio.clone(), "audio/mpeg"))
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    let resp = api
        .get("/download/ytmp3", &params(json!({"url": "https://youtu.be/x"})))
        .await
        .unwrap();
    assert_eq!(resp, NormalizedResponse::Binary(audio));
}

#[tokio::test]
async fn test_raw_request_reports_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1, 2, 3], "image/png"))
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    let raw = api
        .request("/img", HttpMethod::Get, &params(json!({})), &RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(raw.status, 200);
    assert_eq!(raw.content_type.as_deref(), Some("image/png"));
    assert_eq!(raw.body, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_malformed_json_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"status\": 200,", "application/json"))
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    let err = api.get("/broken", &params(json!({}))).await.unwrap_err();
    assert!(matches!(err, AzError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_server_error_keeps_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Network Error"))
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    let err = api.get("/test", &params(json!({}))).await.unwrap_err();
    assert!(matches!(err, AzError::ApiRequest(_)));
    assert!(err.to_string().contains("Network Error"));
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn test_client_error_status_is_api_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::HeaderBearer);
    let err = api.get("/test", &params(json!({}))).await.unwrap_err();
    assert!(matches!(err, AzError::ApiRequest(ref m) if m.contains("401")));
}

#[tokio::test]
async fn test_connection_refused_is_api_request_error() {
    let config = ClientConfig::with_api_key(TEST_KEY, AuthScheme::Query, Some("http://127.0.0.1:1"));
    let api = ApiClient::new(&config).unwrap();
    let err = api.get("/test", &params(json!({}))).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_timeout_is_api_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!(null)))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server, AuthScheme::Query);
    config.timeout_secs = 1;
    let api = ApiClient::new(&config).unwrap();
    let err = api.get("/slow", &params(json!({}))).await.unwrap_err();
    assert!(matches!(err, AzError::ApiRequest(ref m) if m.contains("timed out")));
}

#[tokio::test]
async fn test_media_heuristic_only_changes_accept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/tiktok"))
        .and(header("accept", "*/*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"video": "https://v"}))))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server, AuthScheme::Query);
    config.media_detection = MediaDetection::HeuristicThenContentType;
    let api = ApiClient::new(&config).unwrap();

    // Content type still decides: this media-looking path answered with JSON.
    let resp = api.get("/download/tiktok", &params(json!({}))).await.unwrap();
    assert!(resp.is_json());
}

#[tokio::test]
async fn test_content_type_only_keeps_json_accept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/tiktok"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1], "video/mp4"))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    let resp = api.get("/download/tiktok", &params(json!({}))).await.unwrap();
    assert_eq!(resp.as_bytes(), Some(&[0u8, 1][..]));
}

#[tokio::test]
async fn test_configured_key_replaces_caller_apikey_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::Query);
    api.get("/test", &params(json!({"apikey": "user", "q": "1"})))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let keys: Vec<String> = requests[0]
        .url
        .query_pairs()
        .filter(|(k, _)| k == "apikey")
        .map(|(_, v)| v.into_owned())
        .collect();
    assert_eq!(keys, vec![TEST_KEY.to_string()]);
    assert!(requests[0].url.query_pairs().any(|(k, v)| k == "q" && v == "1"));
}

#[tokio::test]
async fn test_request_header_replaces_media_accept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/tiktok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server, AuthScheme::Query);
    config.media_detection = MediaDetection::HeuristicThenContentType;
    let api = ApiClient::new(&config).unwrap();
    let options = RequestOptions {
        headers: vec![("Accept".into(), "application/json".into())],
        ..RequestOptions::default()
    };
    api.send("/download/tiktok", HttpMethod::Get, &params(json!({})), &options)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let accept: Vec<_> = requests[0].headers.get_all("accept").iter().collect();
    assert_eq!(accept.len(), 1);
    assert_eq!(accept[0], "application/json");
}

#[tokio::test]
async fn test_configured_key_replaces_request_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, AuthScheme::HeaderApiKey);
    let options = RequestOptions {
        headers: vec![("x-api-key".into(), "user".into())],
        ..RequestOptions::default()
    };
    api.send("/test", HttpMethod::Get, &params(json!({})), &options)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let keys: Vec<_> = requests[0].headers.get_all("x-api-key").iter().collect();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0], TEST_KEY);
}

#[tokio::test]
async fn test_invalid_request_header_is_api_request_error() {
    let server = MockServer::start().await;
    let api = api_for(&server, AuthScheme::Query);
    let options = RequestOptions {
        headers: vec![("bad header".into(), "x".into())],
        ..RequestOptions::default()
    };
    let err = api
        .send("/test", HttpMethod::Get, &params(json!({})), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, AzError::ApiRequest(ref m) if m.contains("invalid header name")));
}
