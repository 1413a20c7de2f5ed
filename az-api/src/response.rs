//! Response types and content-type based normalization.
//!
//! JSON responses from the API share a common envelope:
//! ```json
//! { "creator": "Arifzyn", "status": 200, "result": { ... } }
//! ```
//! Anything not served as `application/json` (images, audio, file
//! downloads) is handed back as raw bytes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use az_core::constants;
use az_core::error::{AzError, AzResult};

/// Standard API response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    /// Name of the API author.
    #[serde(default, deserialize_with = "lenient_string")]
    pub creator: String,
    /// Status reported by the server; a number on most deployments, a boolean on some.
    #[serde(default)]
    pub status: serde_json::Value,
    /// Response payload (type varies by endpoint).
    pub result: Option<T>,
}

/// Strings pass through, null becomes empty, anything else is kept as JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl<T> ApiResponse<T> {
    /// Whether the envelope reports success (2xx status or `true`).
    pub fn is_success(&self) -> bool {
        match &self.status {
            serde_json::Value::Bool(ok) => *ok,
            serde_json::Value::Number(n) => n.as_u64().is_some_and(|code| (200..300).contains(&code)),
            _ => false,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Deserialize `result` into a typed value.
    pub fn into_result<T: DeserializeOwned>(self) -> AzResult<T> {
        let result = self.result.ok_or_else(|| {
            AzError::UnexpectedResponseShape("response has no result field".into())
        })?;
        serde_json::from_value(result).map_err(|e| {
            AzError::UnexpectedResponseShape(format!("result has unexpected shape: {e}"))
        })
    }
}

/// A response after content-type inspection: either a JSON envelope or opaque bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResponse {
    Json(ApiResponse),
    Binary(Vec<u8>),
}

impl NormalizedResponse {
    pub fn is_json(&self) -> bool {
        matches!(self, NormalizedResponse::Json(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, NormalizedResponse::Binary(_))
    }

    pub fn as_json(&self) -> Option<&ApiResponse> {
        match self {
            NormalizedResponse::Json(resp) => Some(resp),
            NormalizedResponse::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            NormalizedResponse::Binary(bytes) => Some(bytes),
            NormalizedResponse::Json(_) => None,
        }
    }

    /// Take the JSON envelope, failing if the server sent binary data.
    pub fn into_json(self) -> AzResult<ApiResponse> {
        match self {
            NormalizedResponse::Json(resp) => Ok(resp),
            NormalizedResponse::Binary(bytes) => Err(AzError::UnexpectedResponseShape(format!(
                "expected JSON, got {} bytes of binary data",
                bytes.len()
            ))),
        }
    }
}

/// Raw HTTP response as read off the wire.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Normalize using this response's own `content-type`.
    pub fn normalize(self) -> AzResult<NormalizedResponse> {
        normalize(self.body, self.content_type.as_deref())
    }
}

/// Whether a `content-type` header value selects JSON decoding.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        ct.to_ascii_lowercase()
            .contains(constants::JSON_CONTENT_TYPE)
    })
}

/// Decode `body` as JSON when the content type says JSON, otherwise return
/// the bytes untouched.
///
/// A JSON object is read as the envelope. Any other JSON value (array,
/// string, number) is carried as the `result` of an envelope with no
/// creator and a null status.
pub fn normalize(body: Vec<u8>, content_type: Option<&str>) -> AzResult<NormalizedResponse> {
    if !is_json_content_type(content_type) {
        return Ok(NormalizedResponse::Binary(body));
    }

    let text = String::from_utf8(body)
        .map_err(|e| AzError::MalformedResponse(format!("body is not valid UTF-8: {e}")))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| AzError::MalformedResponse(format!("invalid JSON: {e}")))?;
    if !value.is_object() {
        return Ok(NormalizedResponse::Json(ApiResponse {
            creator: String::new(),
            status: serde_json::Value::Null,
            result: Some(value),
        }));
    }
    let envelope: ApiResponse = serde_json::from_value(value)
        .map_err(|e| AzError::MalformedResponse(format!("invalid envelope: {e}")))?;
    Ok(NormalizedResponse::Json(envelope))
}

/// Guess from the request path whether the response will be media.
///
/// Only used to pick the `accept` header; the response content type still
/// decides how the body is decoded.
pub fn looks_like_media(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default().to_ascii_lowercase();

    if constants::media::PATH_MARKERS
        .iter()
        .any(|marker| path.contains(marker))
    {
        return true;
    }

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => constants::media::EXTENSIONS.contains(&ext),
        None => false,
    }
}
