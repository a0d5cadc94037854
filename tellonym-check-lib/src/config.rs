//! Client configuration and environment overrides.
//!
//! The endpoint URL and header set are fixed for the service; they live in an
//! immutable [`ClientConfig`] built once at startup and handed to the client.
//! [`EnvConfig`] collects the `TC_*` environment variables the CLI falls back
//! to when a flag is not given.

use crate::error::TellonymCheckError;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT,
};
use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

/// Public account-check endpoint.
pub const TELLONYM_API_URL: &str = "https://api.tellonym.me/accounts/check";

/// Client identifier the web app sends; the service admits requests on it.
pub const TELLONYM_CLIENT: &str = "web:3.143.0";

/// Total time allowed for one request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause between consecutive checks.
pub const DEFAULT_PACING: Duration = Duration::from_millis(750);

/// Default number of checks between proxy reselections.
pub const DEFAULT_ROTATE_EVERY: u32 = 5;

/// Immutable settings for the check client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the account-check endpoint
    pub endpoint: String,

    /// Headers sent verbatim on every request
    pub headers: HeaderMap,

    /// Per-request timeout, no retries
    pub timeout: Duration,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`ALL_PROXY` when no proxy is given
    pub system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: TELLONYM_API_URL.to_string(),
            headers: default_headers(),
            timeout: DEFAULT_TIMEOUT,
            system_proxy: true,
        }
    }
}

impl ClientConfig {
    /// Point the client at a different endpoint (mirrors, local test servers).
    pub fn with_endpoint<E: Into<String>>(mut self, endpoint: E) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ignore proxy environment variables for direct requests.
    pub fn without_system_proxy(mut self) -> Self {
        self.system_proxy = false;
        self
    }
}

/// The header set the Tellonym web client sends.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("tellonym-client"),
        HeaderValue::from_static(TELLONYM_CLIENT),
    );
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json;charset=utf-8"),
    );
    headers.insert(ORIGIN, HeaderValue::from_static("https://tellonym.me"));
    headers.insert(REFERER, HeaderValue::from_static("https://tellonym.me/"));
    headers
}

/// Settings read from `TC_*` environment variables.
///
/// Every field is optional; CLI flags take precedence over these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    /// TC_ENDPOINT - override the check endpoint URL
    pub endpoint: Option<String>,

    /// TC_LOG - append results to this file
    pub log: Option<String>,

    /// TC_PROXYFILE - proxy list for rotation
    pub proxyfile: Option<String>,

    /// TC_ROTATE - checks between proxy reselections
    pub rotate: Option<NonZeroU32>,
}

impl EnvConfig {
    /// Build from an arbitrary variable lookup.
    ///
    /// Blank values count as unset. An invalid `TC_ROTATE` is an error rather
    /// than silently ignored, since a bad period must stop the run.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TellonymCheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let rotate = match non_blank("TC_ROTATE") {
            Some(raw) => Some(parse_rotate(&raw).map_err(|e| {
                TellonymCheckError::config(format!("TC_ROTATE: {}", e.reason()))
            })?),
            None => None,
        };

        Ok(Self {
            endpoint: non_blank("TC_ENDPOINT"),
            log: non_blank("TC_LOG"),
            proxyfile: non_blank("TC_PROXYFILE"),
            rotate,
        })
    }
}

/// Load `TC_*` settings from the process environment.
pub fn load_env_config() -> Result<EnvConfig, TellonymCheckError> {
    let config = EnvConfig::from_lookup(|key| env::var(key).ok())?;
    if let Some(endpoint) = &config.endpoint {
        tracing::debug!(endpoint = %endpoint, "using TC_ENDPOINT");
    }
    if let Some(rotate) = config.rotate {
        tracing::debug!(rotate = rotate.get(), "using TC_ROTATE");
    }
    Ok(config)
}

/// Parse a rotation period; it must be a positive integer.
pub fn parse_rotate(raw: &str) -> Result<NonZeroU32, TellonymCheckError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| {
            TellonymCheckError::config(format!(
                "rotation period must be a positive integer, got '{}'",
                raw
            ))
        })
}
