//! Result rendering: terminal lines and the append-only log file.
//!
//! The terminal uses OSINT framing, the inverse of the availability status:
//! an available identifier means no user was found.

use crate::error::TellonymCheckError;
use crate::types::{CheckResult, CheckStatus};
use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Color class of a terminal line; the CLI maps these to styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Identifier is free, nobody behind it (red)
    NotFound,
    /// Identifier belongs to someone (green)
    Found,
    /// The service offered a suggestion (magenta)
    Target,
    /// Check could not be completed (bright red)
    Failure,
    /// Proxy switches and other notices (yellow)
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalLine {
    pub tone: Tone,
    pub text: String,
}

impl TerminalLine {
    fn new(tone: Tone, text: String) -> Self {
        Self { tone, text }
    }
}

/// Lines printed for one result.
pub fn terminal_lines(result: &CheckResult) -> Vec<TerminalLine> {
    match result.status() {
        CheckStatus::Available => vec![TerminalLine::new(
            Tone::NotFound,
            format!("🚫 {} - User Not Found", result.value()),
        )],
        CheckStatus::Unavailable => {
            let mut lines = vec![TerminalLine::new(
                Tone::Found,
                format!("✅ {} - User Found", result.value()),
            )];
            if result.suggestion().is_some() {
                lines.push(TerminalLine::new(Tone::Target, "🎯 Target Found".to_string()));
            }
            lines
        }
        CheckStatus::Error => vec![TerminalLine::new(
            Tone::Failure,
            format!(
                "⚠️ Error checking {}: {}",
                result.value(),
                result.reason_text()
            ),
        )],
    }
}

/// Announcement printed when a new proxy takes effect.
pub fn proxy_line(proxy: &str) -> TerminalLine {
    TerminalLine::new(Tone::Notice, format!("🔁 Using new proxy: {}", proxy))
}

/// Log line for `result`, stamped with `at`. No trailing newline.
pub fn log_line(result: &CheckResult, at: NaiveDateTime) -> String {
    let stamp = at.format("[%Y-%m-%d %H:%M:%S]");
    let body = match result.status() {
        CheckStatus::Available => {
            format!("✅ [{}] {} is available", result.kind(), result.value())
        }
        CheckStatus::Unavailable => format!(
            "❌ [{}] {} is taken – {}",
            result.kind(),
            result.value(),
            result.reason_text()
        ),
        CheckStatus::Error => format!(
            "⚠️ Error checking {}: {}",
            result.value(),
            result.reason_text()
        ),
    };
    format!("{} {}", stamp, body)
}

/// Append-only result log.
///
/// The file is opened, appended to, and closed on every write, so an
/// interrupted run never leaves a half-open handle behind.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line for `result`, stamped with the local time.
    pub fn append(&self, result: &CheckResult) -> Result<(), TellonymCheckError> {
        self.append_at(result, Local::now().naive_local())
    }

    pub fn append_at(
        &self,
        result: &CheckResult,
        at: NaiveDateTime,
    ) -> Result<(), TellonymCheckError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                TellonymCheckError::file_error(self.path.to_string_lossy(), e.to_string())
            })?;
        writeln!(file, "{}", log_line(result, at)).map_err(|e| {
            TellonymCheckError::file_error(self.path.to_string_lossy(), e.to_string())
        })?;
        Ok(())
    }
}
