//! Input helpers: email pre-flight validation and list-file loading.

use crate::error::TellonymCheckError;
use regex::Regex;
use std::fs;
use std::path::Path;

lazy_static::lazy_static! {
    // Prefix match: anything after the first valid `x@y.z` is accepted.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@]+@[^@]+\.[^@]+")
        .expect("email pattern is valid");
}

/// Whether `value` looks like an email address.
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Split list-file content into trimmed, non-empty lines.
///
/// There is no comment syntax; every non-blank line is an entry.
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read identifiers from a file, one per line.
pub fn load_identifiers<P: AsRef<Path>>(path: P) -> Result<Vec<String>, TellonymCheckError> {
    let path = path.as_ref();
    let content = read_list_file(path)?;
    let identifiers = parse_lines(&content);
    tracing::debug!(path = %path.display(), count = identifiers.len(), "loaded identifiers");
    Ok(identifiers)
}

/// Read proxy URLs from a file, one per line.
///
/// Every entry must carry a scheme (`http://`, `socks5://`, ...) so it can be
/// applied to both plain and TLS traffic.
pub fn load_proxies<P: AsRef<Path>>(path: P) -> Result<Vec<String>, TellonymCheckError> {
    let path = path.as_ref();
    let content = read_list_file(path)?;

    let mut proxies = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !has_scheme(line) {
            return Err(TellonymCheckError::file_error(
                path.to_string_lossy(),
                format!(
                    "line {}: proxy '{}' must be a full URL such as http://host:port",
                    number + 1,
                    line
                ),
            ));
        }
        proxies.push(line.to_string());
    }

    tracing::debug!(path = %path.display(), count = proxies.len(), "loaded proxies");
    Ok(proxies)
}

fn has_scheme(url: &str) -> bool {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            !rest.is_empty()
                && !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn read_list_file(path: &Path) -> Result<String, TellonymCheckError> {
    fs::read_to_string(path)
        .map_err(|e| TellonymCheckError::file_error(path.to_string_lossy(), e.to_string()))
}
