// tellonym-check-lib/tests/run.rs

//! Full runs: scheduler + real client + log file against a mock endpoint.

mod common;

use common::{MockEndpoint, Reply};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::num::NonZeroU32;
use std::time::Duration;
use tellonym_check_lib::{
    CheckResult, CheckStatus, ClientConfig, IdentifierKind, LogFile, ProxyPool, Reporter,
    RotationPolicy, Scheduler, TellonymClient,
};
use tempfile::TempDir;

/// Collects results and writes them to a log file, like the CLI does.
struct CollectingReporter {
    results: Vec<CheckResult>,
    proxies: Vec<String>,
    log: Option<LogFile>,
}

impl CollectingReporter {
    fn new(log: Option<LogFile>) -> Self {
        Self {
            results: Vec::new(),
            proxies: Vec::new(),
            log,
        }
    }
}

impl Reporter for CollectingReporter {
    fn proxy_selected(&mut self, proxy: &str) {
        self.proxies.push(proxy.to_string());
    }

    fn report(&mut self, _index: usize, _total: usize, result: &CheckResult) {
        if let Some(log) = &self.log {
            log.append(result).unwrap();
        }
        self.results.push(result.clone());
    }
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn fast_scheduler(pool: Option<ProxyPool>) -> Scheduler<StdRng> {
    Scheduler::new(
        RotationPolicy::new(NonZeroU32::new(2).unwrap()),
        pool,
        StdRng::seed_from_u64(9),
    )
    .with_pacing(Duration::ZERO)
}

#[tokio::test]
async fn test_http_500_does_not_stop_the_run() {
    let mock = MockEndpoint::start_with(|request| match request.username().as_deref() {
        Some("bob") => Reply::status(500),
        Some("carol") => Reply::json(json!({"username": false, "usernameError": {"msg": "taken"}})),
        _ => Reply::json(json!({"username": true})),
    })
    .await;
    let client =
        TellonymClient::with_config(
            ClientConfig::default()
                .without_system_proxy()
                .with_endpoint(mock.url()),
        )
        .unwrap();
    let mut reporter = CollectingReporter::new(None);

    let summary = fast_scheduler(None)
        .run(
            &names(&["alice", "bob", "carol", "dave"]),
            IdentifierKind::Username,
            &client,
            &mut reporter,
        )
        .await;

    let statuses: Vec<(&str, CheckStatus)> = reporter
        .results
        .iter()
        .map(|r| (r.value(), r.status()))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("alice", CheckStatus::Available),
            ("bob", CheckStatus::Error),
            ("carol", CheckStatus::Unavailable),
            ("dave", CheckStatus::Available),
        ]
    );
    assert_eq!(reporter.results[1].reason(), Some("HTTP 500"));
    assert_eq!(summary.checked, 4);
    assert_eq!(summary.errors, 1);
    assert_eq!(mock.requests().len(), 4);
}

#[tokio::test]
async fn test_transport_failure_does_not_stop_the_run() {
    let mock = MockEndpoint::start_with(|request| match request.username().as_deref() {
        Some("bob") => Reply::Drop,
        _ => Reply::json(json!({"username": true})),
    })
    .await;
    let client =
        TellonymClient::with_config(
            ClientConfig::default()
                .without_system_proxy()
                .with_endpoint(mock.url()),
        )
        .unwrap();
    let mut reporter = CollectingReporter::new(None);

    fast_scheduler(None)
        .run(
            &names(&["bob", "eve"]),
            IdentifierKind::Username,
            &client,
            &mut reporter,
        )
        .await;

    assert_eq!(reporter.results[0].status(), CheckStatus::Error);
    assert_eq!(reporter.results[1].status(), CheckStatus::Available);
}

#[tokio::test]
async fn test_one_log_line_per_result() {
    let mock = MockEndpoint::start_with(|request| match request.username().as_deref() {
        Some("alice") => Reply::json(json!({
            "username": false,
            "usernameError": {"msg": "taken"},
            "suggestion": "alice2"
        })),
        Some("bob") => Reply::status(429),
        _ => Reply::json(json!({"username": true})),
    })
    .await;
    let client =
        TellonymClient::with_config(
            ClientConfig::default()
                .without_system_proxy()
                .with_endpoint(mock.url()),
        )
        .unwrap();
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("scan.log");
    let mut reporter = CollectingReporter::new(Some(LogFile::new(&log_path)));

    fast_scheduler(None)
        .run(
            &names(&["alice", "bob", "carol"]),
            IdentifierKind::Username,
            &client,
            &mut reporter,
        )
        .await;

    let content = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);

    let stamp = regex::Regex::new(r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\] ").unwrap();
    assert!(lines.iter().all(|line| stamp.is_match(line)));
    assert!(lines[0].ends_with("❌ [username] alice is taken – taken"));
    assert!(lines[1].ends_with("⚠️ Error checking bob: HTTP 429"));
    assert!(lines[2].ends_with("✅ [username] carol is available"));
}

#[tokio::test]
async fn test_rotation_routes_through_selected_proxies() {
    let first = MockEndpoint::start(Reply::json(json!({"username": true}))).await;
    let second = MockEndpoint::start(Reply::json(json!({"username": true}))).await;
    let pool = ProxyPool::new(vec![first.proxy_url(), second.proxy_url()]);
    let config = ClientConfig::default()
        .without_system_proxy()
        .with_endpoint("http://api.tellonym.invalid/accounts/check");
    let client = TellonymClient::with_config(config).unwrap();
    let mut reporter = CollectingReporter::new(None);

    let summary = fast_scheduler(pool)
        .run(
            &names(&["u1", "u2", "u3", "u4", "u5"]),
            IdentifierKind::Username,
            &client,
            &mut reporter,
        )
        .await;

    // period 2 over 5 items: draws before items 1, 2 and 4
    assert_eq!(summary.proxy_switches, 3);
    assert_eq!(reporter.proxies.len(), 3);
    assert!(reporter.results.iter().all(|r| r.status() == CheckStatus::Available));
    assert_eq!(first.requests().len() + second.requests().len(), 5);
}
