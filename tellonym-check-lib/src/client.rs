//! Check client for the Tellonym account-check endpoint.
//!
//! One GET per identifier, no retries. Every failure is folded into a
//! `CheckResult` with `status: error`, so callers never have to handle an
//! `Err` per item.

use crate::config::ClientConfig;
use crate::error::TellonymCheckError;
use crate::types::{CheckResult, IdentifierKind};
use crate::utils::is_email;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Reason reported for email-mode values that fail pre-flight validation.
pub const INVALID_EMAIL_REASON: &str = "Invalid email format";

/// Anything that can check a single identifier.
///
/// The scheduler is generic over this so runs can be driven without a
/// network in tests.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, value: &str, kind: IdentifierKind, proxy: Option<&str>) -> CheckResult;
}

/// Body returned by the account-check endpoint.
///
/// Fields are kept as raw JSON values: the service is loose about types and
/// only truthiness matters for the availability flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    /// Truthy when the email is free to register
    #[serde(default)]
    pub email: Value,

    /// Truthy when the username is free to register
    #[serde(default)]
    pub username: Value,

    #[serde(default)]
    pub email_error: Value,

    /// Object with a `msg` field
    #[serde(default)]
    pub username_error: Value,

    #[serde(default)]
    pub suggestion: Value,
}

impl CheckResponse {
    /// Parse a response body. Anything but a JSON object is a decoding error.
    pub fn from_slice(body: &[u8]) -> Result<Self, TellonymCheckError> {
        let json: Value = serde_json::from_slice(body)?;
        if !json.is_object() {
            return Err(TellonymCheckError::parse(format!(
                "expected a JSON object, found {}",
                json_type_name(&json)
            )));
        }
        Ok(serde_json::from_value(json)?)
    }

    /// Map the response onto a result for `value`.
    ///
    /// A truthy flag means the identifier is free, so it maps to `Available`.
    pub fn into_result(self, value: &str, kind: IdentifierKind) -> CheckResult {
        match kind {
            IdentifierKind::Email => {
                if is_truthy(&self.email) {
                    CheckResult::available(value, kind)
                } else {
                    let reason = text_or(&self.email_error, "Unknown error");
                    CheckResult::unavailable(value, kind, reason, None)
                }
            }
            IdentifierKind::Username => {
                if is_truthy(&self.username) {
                    CheckResult::available(value, kind)
                } else {
                    let msg = self.username_error.get("msg").unwrap_or(&Value::Null);
                    let reason = text_or(msg, "Unknown");
                    let suggestion = if is_truthy(&self.suggestion) {
                        Some(text_or(&self.suggestion, ""))
                    } else {
                        None
                    };
                    CheckResult::unavailable(value, kind, reason, suggestion)
                }
            }
        }
    }
}

/// Loose truthiness: false, null, zero and empty containers/strings are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn text_or(value: &Value, fallback: &str) -> String {
    match value {
        Value::Null => fallback.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// HTTP client for the account-check endpoint.
///
/// Keeps one `reqwest::Client` for direct traffic and one per proxy URL seen,
/// all living as long as the checker, so switching proxies does not tear
/// down pooled connections.
pub struct TellonymClient {
    config: ClientConfig,
    direct: reqwest::Client,
    proxied: Mutex<HashMap<String, reqwest::Client>>,
}

impl TellonymClient {
    /// Create a client for the public endpoint with the default headers.
    pub fn new() -> Result<Self, TellonymCheckError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, TellonymCheckError> {
        let direct = build_http_client(&config, None)?;
        Ok(Self {
            config,
            direct,
            proxied: Mutex::new(HashMap::new()),
        })
    }

    /// Check one identifier, surfacing failures as errors.
    ///
    /// [`Checker::check`] wraps this and folds the error into the result.
    pub async fn check_identifier(
        &self,
        value: &str,
        kind: IdentifierKind,
        proxy: Option<&str>,
    ) -> Result<CheckResult, TellonymCheckError> {
        if kind == IdentifierKind::Email && !is_email(value) {
            return Err(TellonymCheckError::invalid_identifier(
                value,
                INVALID_EMAIL_REASON,
            ));
        }

        let client = self.client_for(proxy)?;
        let limit = kind.limit().to_string();
        let query = [(kind.param_name(), value), ("limit", limit.as_str())];

        tracing::debug!(%kind, value, proxy, "sending account check");
        let response = client
            .get(&self.config.endpoint)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(value, status = status.as_u16(), "account check answered");
        if status != StatusCode::OK {
            return Err(TellonymCheckError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let parsed = CheckResponse::from_slice(&body)?;
        Ok(parsed.into_result(value, kind))
    }

    fn client_for(&self, proxy: Option<&str>) -> Result<reqwest::Client, TellonymCheckError> {
        let Some(url) = proxy else {
            return Ok(self.direct.clone());
        };

        let mut cache = self
            .proxied
            .lock()
            .map_err(|_| TellonymCheckError::internal("proxy client cache poisoned"))?;
        if let Some(client) = cache.get(url) {
            return Ok(client.clone());
        }

        let client = build_http_client(&self.config, Some(url))?;
        cache.insert(url.to_string(), client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Checker for TellonymClient {
    async fn check(&self, value: &str, kind: IdentifierKind, proxy: Option<&str>) -> CheckResult {
        match self.check_identifier(value, kind, proxy).await {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(value, error = %e, "account check failed");
                CheckResult::error(value, kind, e.reason())
            }
        }
    }
}

/// Build a client with the fixed headers and timeout.
///
/// Header names go out in Title-Case (`Tellonym-Client`, `User-Agent`), the
/// way the web client sends them. Without an explicit proxy the usual proxy
/// environment variables apply unless the config turns them off.
fn build_http_client(
    config: &ClientConfig,
    proxy: Option<&str>,
) -> Result<reqwest::Client, TellonymCheckError> {
    let builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .default_headers(config.headers.clone())
        .http1_title_case_headers();

    let builder = match proxy {
        Some(url) => builder.proxy(reqwest::Proxy::all(url)?),
        None if !config.system_proxy => builder.no_proxy(),
        None => builder,
    };

    Ok(builder.build()?)
}
