//! HTTP transport for the Arifzyn feature API.
//!
//! Handles base URL joining, API key attachment, default headers, body
//! encoding, the media accept hint, and request/response lifecycle. Every
//! failure originating in the HTTP layer is surfaced as `AzError::ApiRequest`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, warn};

use az_core::config::{AppConfig, AuthScheme, BodyEncoding, ClientConfig, Credentials, MediaDetection};
use az_core::constants;
use az_core::error::{AzError, AzResult};

use crate::method::HttpMethod;
use crate::response::{looks_like_media, NormalizedResponse, RawResponse};

/// Request parameters: query string for GET/DELETE, body for POST/PUT/PATCH.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Maximum number of characters of an error body kept in the error message.
const ERROR_BODY_LIMIT: usize = 512;

/// Per-request overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers for this request only.
    pub headers: Vec<(String, String)>,
    /// Body encoding override; falls back to the client's configured encoding.
    pub body_encoding: Option<BodyEncoding>,
}

/// HTTP client for the feature API.
///
/// Wraps reqwest::Client with API key handling and error normalization.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    /// Sanitized base URL without trailing slash.
    base_url: String,
    /// API key and the scheme attaching it, if any.
    credentials: Option<Credentials>,
    media_detection: MediaDetection,
    body_encoding: BodyEncoding,
    timeout: Duration,
}

impl ApiClient {
    /// Create a new ApiClient from client configuration.
    pub fn new(config: &ClientConfig) -> AzResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        for (name, value) in config.merged_headers() {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| AzError::Config(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| AzError::Config(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }

        let timeout = config.timeout();
        let inner = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| AzError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            base_url: AppConfig::sanitize_base_url(&config.base_url),
            credentials: config.credentials()?,
            media_detection: config.media_detection,
            body_encoding: config.body_encoding,
            timeout,
        })
    }

    /// Get the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The auth scheme in use, if an API key is configured.
    pub fn auth_scheme(&self) -> Option<AuthScheme> {
        self.credentials.as_ref().map(|c| c.scheme)
    }

    /// Build the full URL for an API path. A leading `/` is optional.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Query parameter the configured key occupies, if any. A caller's
    /// value under this name is replaced by the configured key.
    fn reserved_query_key(&self) -> Option<&'static str> {
        match &self.credentials {
            Some(creds) if creds.scheme == AuthScheme::Query => Some(constants::APIKEY_QUERY_PARAM),
            _ => None,
        }
    }

    /// Attach the API key according to the configured scheme. Header schemes
    /// write into `headers` so the key replaces any per-request value.
    fn apply_auth(&self, builder: RequestBuilder, headers: &mut HeaderMap) -> AzResult<RequestBuilder> {
        let Some(creds) = &self.credentials else {
            return Ok(builder);
        };
        match creds.scheme {
            AuthScheme::Query => {
                Ok(builder.query(&[(constants::APIKEY_QUERY_PARAM, creds.key.as_str())]))
            }
            AuthScheme::HeaderApiKey => {
                headers.insert(
                    HeaderName::from_static(constants::APIKEY_HEADER),
                    header_value(&creds.key)?,
                );
                Ok(builder)
            }
            AuthScheme::HeaderBearer => {
                headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", creds.key))?);
                Ok(builder)
            }
        }
    }

    /// Internal: build a request with parameters placed per method and encoding.
    ///
    /// Per-request headers replace the media accept hint and client defaults
    /// of the same name; the API key is applied last.
    fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        data: &Params,
        options: &RequestOptions,
    ) -> AzResult<RequestBuilder> {
        let mut builder = self.inner.request(method.to_reqwest(), self.url(path));

        if method.has_body() {
            builder = match options.body_encoding.unwrap_or(self.body_encoding) {
                BodyEncoding::Json => builder.json(data),
                BodyEncoding::Multipart => builder.multipart(multipart_form(data)),
            };
        } else {
            let reserved = self.reserved_query_key();
            let pairs: Vec<(String, String)> = param_pairs(data)
                .into_iter()
                .filter(|(k, _)| Some(k.as_str()) != reserved)
                .collect();
            if !pairs.is_empty() {
                builder = builder.query(&pairs);
            }
        }

        let mut headers = HeaderMap::new();
        if self.media_detection == MediaDetection::HeuristicThenContentType
            && looks_like_media(path)
        {
            debug!("{path} looks like media, requesting {}", constants::headers::MEDIA_ACCEPT);
            headers.insert(ACCEPT, HeaderValue::from_static(constants::headers::MEDIA_ACCEPT));
        }

        for (key, value) in &options.headers {
            let name = HeaderName::try_from(key.as_str())
                .map_err(|e| AzError::ApiRequest(format!("invalid header name {key:?}: {e}")))?;
            headers.insert(name, header_value(value)?);
        }

        let builder = self.apply_auth(builder, &mut headers)?;
        Ok(builder.headers(headers))
    }

    /// Issue a request and read the whole body.
    ///
    /// Network errors, timeouts, and non-2xx statuses are returned as
    /// `AzError::ApiRequest` after a warning is logged.
    pub async fn request(
        &self,
        path: &str,
        method: HttpMethod,
        data: &Params,
        options: &RequestOptions,
    ) -> AzResult<RawResponse> {
        debug!("{} {}", method, path);

        let builder = self
            .build_request(method, path, data, options)
            .inspect_err(|err| warn!("{} {} failed: {}", method, path, err))?;
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = Self::classify_error(e);
                warn!("{} {} failed: {}", method, path, err);
                return Err(err);
            }
        };

        match Self::read_response(response).await {
            Ok(raw) => {
                debug!(
                    "{} {} -> {} ({} bytes, {})",
                    method,
                    path,
                    raw.status,
                    raw.body.len(),
                    raw.content_type.as_deref().unwrap_or("no content-type")
                );
                Ok(raw)
            }
            Err(err) => {
                warn!("{} {} failed: {}", method, path, err);
                Err(err)
            }
        }
    }

    /// Issue a request and normalize the response by content type.
    pub async fn send(
        &self,
        path: &str,
        method: HttpMethod,
        data: &Params,
        options: &RequestOptions,
    ) -> AzResult<NormalizedResponse> {
        self.request(path, method, data, options).await?.normalize()
    }

    // --- Public HTTP methods ---

    /// GET with `params` as query string.
    pub async fn get(&self, path: &str, params: &Params) -> AzResult<NormalizedResponse> {
        self.send(path, HttpMethod::Get, params, &RequestOptions::default())
            .await
    }

    /// POST with `data` as body.
    pub async fn post(&self, path: &str, data: &Params) -> AzResult<NormalizedResponse> {
        self.send(path, HttpMethod::Post, data, &RequestOptions::default())
            .await
    }

    /// PUT with `data` as body.
    pub async fn put(&self, path: &str, data: &Params) -> AzResult<NormalizedResponse> {
        self.send(path, HttpMethod::Put, data, &RequestOptions::default())
            .await
    }

    /// DELETE with `params` as query string.
    pub async fn delete(&self, path: &str, params: &Params) -> AzResult<NormalizedResponse> {
        self.send(path, HttpMethod::Delete, params, &RequestOptions::default())
            .await
    }

    /// PATCH with `data` as body.
    pub async fn patch(&self, path: &str, data: &Params) -> AzResult<NormalizedResponse> {
        self.send(path, HttpMethod::Patch, data, &RequestOptions::default())
            .await
    }

    // --- Response helpers ---

    /// Check the status and buffer the body.
    async fn read_response(response: Response) -> AzResult<RawResponse> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = body.trim();
            let message = if body.is_empty() {
                format!("server returned {status}")
            } else {
                format!("server returned {status}: {}", truncate_chars(body, ERROR_BODY_LIMIT))
            };
            return Err(AzError::ApiRequest(message));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| AzError::ApiRequest(format!("failed to read response body: {e}")))?;

        Ok(RawResponse {
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }

    /// Classify a reqwest error into an ApiRequest message.
    fn classify_error(e: reqwest::Error) -> AzError {
        if e.is_timeout() {
            AzError::ApiRequest(format!("request timed out: {e}"))
        } else if e.is_connect() {
            AzError::ApiRequest(format!("connection failed: {e}"))
        } else {
            AzError::ApiRequest(e.to_string())
        }
    }
}

/// Render a parameter value the way it appears in a query string or form field.
/// Returns `None` for nulls, which are omitted.
fn param_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Flatten params into ordered key/value pairs.
fn param_pairs(data: &Params) -> Vec<(String, String)> {
    data.iter()
        .filter_map(|(k, v)| param_value(v).map(|v| (k.clone(), v)))
        .collect()
}

fn multipart_form(data: &Params) -> reqwest::multipart::Form {
    param_pairs(data)
        .into_iter()
        .fold(reqwest::multipart::Form::new(), |form, (k, v)| form.text(k, v))
}

fn header_value(value: &str) -> AzResult<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| AzError::ApiRequest(format!("invalid header value: {e}")))
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
