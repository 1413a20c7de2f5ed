//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "Arifzyn";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of the daily-rotated log file.
pub const LOG_FILE_NAME: &str = "arifzyn.log";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.arifzyn.site";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the endpoint catalog, relative to the base URL.
pub const ENDPOINT_CATALOG_PATH: &str = "endpoint";

/// Content type that selects JSON decoding.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Query parameter name used by the `query` auth scheme.
pub const APIKEY_QUERY_PARAM: &str = "apikey";

/// Header name used by the `header_api_key` auth scheme.
pub const APIKEY_HEADER: &str = "x-api-key";

/// Default headers sent with every request.
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const USER_AGENT: &str = "user-agent";

    pub const DEFAULT_ACCEPT: &str = "application/json";
    pub const DEFAULT_USER_AGENT: &str = "okhttp/4.9.0";

    /// Accept value sent when a request is expected to return media.
    pub const MEDIA_ACCEPT: &str = "*/*";
}

/// Path hints used by the media heuristic.
pub mod media {
    /// Substrings that mark a path as a likely binary download.
    pub const PATH_MARKERS: &[&str] = &["download", "media"];

    /// File extensions that mark a path as a likely binary download.
    pub const EXTENSIONS: &[&str] = &[
        "png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "mp3", "wav", "ogg", "m4a", "mp4",
        "webm", "mkv", "mov", "pdf", "zip",
    ];
}
