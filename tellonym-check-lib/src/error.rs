//! Error handling for availability checking.
//!
//! Per-item failures never abort a run: the check client folds them into a
//! `CheckResult` using [`TellonymCheckError::reason`]. The remaining variants
//! (configuration and file errors) are fatal at startup.

use std::fmt;

/// Main error type for the library.
#[derive(Debug, Clone)]
pub enum TellonymCheckError {
    /// Identifier rejected before any network activity
    InvalidIdentifier { value: String, reason: String },

    /// Transport failures (DNS, connect, TLS, timeout, proxy)
    Network { message: String },

    /// The endpoint answered with a status other than 200
    Http { status: u16 },

    /// The response body was not the expected JSON object
    Parse { message: String },

    /// Invalid settings (rotation period, environment values)
    Config { message: String },

    /// Input or proxy file could not be read
    File { path: String, message: String },

    /// Anything that doesn't fit the categories above
    Internal { message: String },
}

impl TellonymCheckError {
    /// Create a new invalid identifier error.
    pub fn invalid_identifier<V: Into<String>, R: Into<String>>(value: V, reason: R) -> Self {
        Self::InvalidIdentifier {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The reason text carried by an `error` result.
    ///
    /// Unlike `Display`, this is the bare message without a category prefix:
    /// `"Invalid email format"`, `"HTTP 429"`, or the transport/decoder text.
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidIdentifier { reason, .. } => reason.clone(),
            Self::Network { message } => message.clone(),
            Self::Http { status } => format!("HTTP {}", status),
            Self::Parse { message } => message.clone(),
            Self::Config { message } => message.clone(),
            Self::File { message, .. } => message.clone(),
            Self::Internal { message } => message.clone(),
        }
    }
}

impl fmt::Display for TellonymCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier { value, reason } => {
                write!(f, "Invalid identifier '{}': {}", value, reason)
            }
            Self::Network { message } => write!(f, "Network error: {}", message),
            Self::Http { status } => write!(f, "Endpoint returned HTTP {}", status),
            Self::Parse { message } => write!(f, "Parse error: {}", message),
            Self::Config { message } => write!(f, "Configuration error: {}", message),
            Self::File { path, message } => write!(f, "File error at '{}': {}", path, message),
            Self::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for TellonymCheckError {}

/// Render an error followed by its source chain, joined with `": "`.
///
/// reqwest's top-level message ("error sending request for url ...") hides
/// the useful part (connection refused, timed out) in its sources.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl From<reqwest::Error> for TellonymCheckError {
    fn from(err: reqwest::Error) -> Self {
        Self::network(error_chain(&err))
    }
}

impl From<serde_json::Error> for TellonymCheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}
