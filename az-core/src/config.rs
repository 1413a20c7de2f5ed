//! Application configuration management.
//!
//! Handles loading, saving, and validating the client configuration: base
//! URL, API key and the scheme used to attach it, response-type detection,
//! body encoding, and logging. Configuration is persisted as TOML on disk.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{AzError, AzResult};
use crate::platform;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP client settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the API key is attached to outgoing requests.
///
/// Deployments disagree on this, so there is deliberately no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `?apikey=<key>` on every request.
    Query,
    /// `x-api-key: <key>` header.
    HeaderApiKey,
    /// `Authorization: Bearer <key>` header.
    HeaderBearer,
}

/// How the client decides between JSON and binary responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaDetection {
    /// Only the response `content-type` is consulted.
    #[default]
    ContentTypeOnly,
    /// Media-looking paths are requested with a permissive `accept` header;
    /// the response `content-type` still decides decoding.
    HeuristicThenContentType,
}

/// How request bodies are encoded for POST, PUT, and PATCH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
    /// `application/json` body.
    #[default]
    Json,
    /// `multipart/form-data` with one text part per parameter.
    Multipart,
}

/// A validated API key together with the scheme that attaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub scheme: AuthScheme,
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://api.arifzyn.site").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key. Absent or empty means requests are sent unauthenticated.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Scheme used to attach `api_key`. Required whenever a key is set.
    #[serde(default)]
    pub auth_scheme: Option<AuthScheme>,

    /// Response-type detection mode.
    #[serde(default)]
    pub media_detection: MediaDetection,

    /// Request body encoding.
    #[serde(default)]
    pub body_encoding: BodyEncoding,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Headers sent with every request.
    #[serde(default = "default_headers")]
    pub default_headers: BTreeMap<String, String>,

    /// Additional headers layered over `default_headers`.
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

fn default_base_url() -> String {
    constants::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            constants::headers::ACCEPT.to_string(),
            constants::headers::DEFAULT_ACCEPT.to_string(),
        ),
        (
            constants::headers::USER_AGENT.to_string(),
            constants::headers::DEFAULT_USER_AGENT.to_string(),
        ),
    ])
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            auth_scheme: None,
            media_detection: MediaDetection::default(),
            body_encoding: BodyEncoding::default(),
            timeout_secs: default_timeout_secs(),
            default_headers: default_headers(),
            extra_headers: BTreeMap::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl ClientConfig {
    /// Build a config for the given key and scheme, optionally overriding the base URL.
    pub fn with_api_key(
        api_key: impl Into<String>,
        scheme: AuthScheme,
        base_url: Option<&str>,
    ) -> Self {
        let mut config = Self {
            api_key: Some(api_key.into()),
            auth_scheme: Some(scheme),
            ..Self::default()
        };
        if let Some(url) = base_url {
            config.base_url = url.to_string();
        }
        config
    }

    /// Resolve the API key and its scheme.
    ///
    /// Returns `Ok(None)` when no key is configured. A key without a scheme
    /// is rejected rather than guessed.
    pub fn credentials(&self) -> AzResult<Option<Credentials>> {
        let key = match self.api_key.as_deref().map(str::trim) {
            Some(k) if !k.is_empty() => k.to_string(),
            _ => return Ok(None),
        };
        let scheme = self.auth_scheme.ok_or_else(|| {
            AzError::MissingConfig(
                "auth_scheme must be set when api_key is configured \
                 (query, header_api_key, or header_bearer)"
                    .into(),
            )
        })?;
        Ok(Some(Credentials { key, scheme }))
    }

    /// The request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// All headers to send, with `extra_headers` taking precedence.
    pub fn merged_headers(&self) -> BTreeMap<String, String> {
        let mut merged = self.default_headers.clone();
        for (k, v) in &self.extra_headers {
            merged.insert(k.to_ascii_lowercase(), v.clone());
        }
        merged
    }

    /// Check the config for values the client cannot use.
    pub fn validate(&self) -> AzResult<()> {
        if AppConfig::sanitize_base_url(&self.base_url).is_empty() {
            return Err(AzError::MissingConfig("base_url".into()));
        }
        if self.timeout_secs == 0 {
            return Err(AzError::Config("timeout_secs must be greater than zero".into()));
        }
        self.credentials()?;
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> AzResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> AzResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> AzResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AzError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> AzResult<PathBuf> {
        Ok(platform::config_dir()?.join("config.toml"))
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> AzResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(platform::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Sanitize and normalize a base URL.
    ///
    /// Trims whitespace and quotes, defaults to https when no scheme is
    /// given, and strips trailing slashes.
    pub fn sanitize_base_url(address: &str) -> String {
        let trimmed = address.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        with_scheme.trim_end_matches('/').to_string()
    }
}

impl AuthScheme {
    /// The config/CLI spelling of this scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Query => "query",
            AuthScheme::HeaderApiKey => "header_api_key",
            AuthScheme::HeaderBearer => "header_bearer",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = AzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "query" => Ok(AuthScheme::Query),
            "header_api_key" | "x_api_key" => Ok(AuthScheme::HeaderApiKey),
            "header_bearer" | "bearer" => Ok(AuthScheme::HeaderBearer),
            other => Err(AzError::Config(format!("unknown auth scheme: {other}"))),
        }
    }
}
