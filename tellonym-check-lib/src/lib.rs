//! # Tellonym Check Library
//!
//! Availability checking for Tellonym usernames and emails against the
//! service's public account-check endpoint, with optional proxy rotation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tellonym_check_lib::{Checker, IdentifierKind, TellonymClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TellonymClient::new()?;
//!     let result = client.check("alice", IdentifierKind::Username, None).await;
//!
//!     println!("{}: {}", result.value(), result.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Three-valued results**: available, unavailable (with reason and
//!   suggestion), or error
//! - **Proxy rotation**: random draw from a pool every N checks
//! - **Paced runs**: one check at a time with a fixed pause in between
//! - **Log file**: timestamped, append-only result lines

pub use client::{is_truthy, CheckResponse, Checker, TellonymClient, INVALID_EMAIL_REASON};
pub use config::{
    default_headers, load_env_config, parse_rotate, ClientConfig, EnvConfig, DEFAULT_PACING,
    DEFAULT_ROTATE_EVERY, DEFAULT_TIMEOUT, TELLONYM_API_URL, TELLONYM_CLIENT,
};
pub use error::TellonymCheckError;
pub use report::{log_line, proxy_line, terminal_lines, LogFile, TerminalLine, Tone};
pub use scheduler::{ProxyPool, Reporter, RotationPolicy, Scheduler};
pub use types::{CheckResult, CheckStatus, IdentifierKind, RunSummary};
pub use utils::{is_email, load_identifiers, load_proxies, parse_lines};

mod client;
mod config;
mod error;
mod report;
mod scheduler;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TellonymCheckError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
