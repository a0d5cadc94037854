//! Core data types for availability checking.
//!
//! `CheckResult` is built only through its constructors, which keep the
//! reason/suggestion fields consistent with the status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of identifier is being probed.
///
/// Chosen by the caller's mode, never inferred from the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Email,
    Username,
}

impl IdentifierKind {
    /// Name of the query parameter carrying the identifier.
    pub fn param_name(self) -> &'static str {
        match self {
            IdentifierKind::Email => "email",
            IdentifierKind::Username => "username",
        }
    }

    /// Value of the `limit` query parameter sent with this kind.
    pub fn limit(self) -> u32 {
        match self {
            IdentifierKind::Email => 25,
            IdentifierKind::Username => 4,
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

/// Outcome of a single check.
///
/// `Available` means the service reports the identifier as free to register,
/// i.e. no account uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Available,
    Unavailable,
    Error,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Available => write!(f, "available"),
            CheckStatus::Unavailable => write!(f, "unavailable"),
            CheckStatus::Error => write!(f, "error"),
        }
    }
}

/// Result of checking one identifier.
///
/// Fields are private; the constructors are the only way to build one, so a
/// result never carries a reason while available, nor a suggestion unless it
/// is a taken username.
///
/// ```compile_fail
/// use tellonym_check_lib::{CheckResult, CheckStatus, IdentifierKind};
///
/// let _ = CheckResult {
///     value: "alice".to_string(),
///     kind: IdentifierKind::Username,
///     status: CheckStatus::Available,
///     reason: Some("taken".to_string()),
///     suggestion: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    value: String,
    kind: IdentifierKind,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl CheckResult {
    pub fn available<V: Into<String>>(value: V, kind: IdentifierKind) -> Self {
        Self {
            value: value.into(),
            kind,
            status: CheckStatus::Available,
            reason: None,
            suggestion: None,
        }
    }

    /// A taken identifier. The suggestion is dropped for email checks.
    pub fn unavailable<V: Into<String>, R: Into<String>>(
        value: V,
        kind: IdentifierKind,
        reason: R,
        suggestion: Option<String>,
    ) -> Self {
        let suggestion = match kind {
            IdentifierKind::Username => suggestion.filter(|s| !s.is_empty()),
            IdentifierKind::Email => None,
        };
        Self {
            value: value.into(),
            kind,
            status: CheckStatus::Unavailable,
            reason: Some(reason.into()),
            suggestion,
        }
    }

    pub fn error<V: Into<String>, R: Into<String>>(
        value: V,
        kind: IdentifierKind,
        reason: R,
    ) -> Self {
        Self {
            value: value.into(),
            kind,
            status: CheckStatus::Error,
            reason: Some(reason.into()),
            suggestion: None,
        }
    }

    /// The identifier as it was checked.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn status(&self) -> CheckStatus {
        self.status
    }

    /// Why the identifier is taken, or what went wrong.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Alternative proposed by the service for a taken username.
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Reason text, or an empty string for available results.
    pub fn reason_text(&self) -> &str {
        self.reason().unwrap_or("")
    }
}

/// Tallies for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub checked: usize,
    pub available: usize,
    pub unavailable: usize,
    pub errors: usize,
    /// How many times a proxy was (re)selected
    pub proxy_switches: usize,
}

impl RunSummary {
    pub(crate) fn record(&mut self, result: &CheckResult) {
        self.checked += 1;
        match result.status() {
            CheckStatus::Available => self.available += 1,
            CheckStatus::Unavailable => self.unavailable += 1,
            CheckStatus::Error => self.errors += 1,
        }
    }
}
