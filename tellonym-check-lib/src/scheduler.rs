//! Sequential check loop with proxy rotation and fixed pacing.
//!
//! Items are checked one at a time, in input order. Before item `i`
//! (1-indexed) a new proxy is drawn when `i == 1` or `i` is a multiple of the
//! rotation period. After every item, including the last, the loop sleeps
//! for the pacing interval.

use crate::client::Checker;
use crate::config::{DEFAULT_PACING, DEFAULT_ROTATE_EVERY};
use crate::types::{CheckResult, IdentifierKind, RunSummary};
use rand::seq::SliceRandom;
use rand::Rng;
use std::num::NonZeroU32;
use std::time::Duration;

/// Receives the events of a run, in order.
pub trait Reporter {
    /// A new proxy is in effect from the next check on.
    fn proxy_selected(&mut self, proxy: &str);

    /// Result for the `index`-th input (1-indexed) out of `total`.
    fn report(&mut self, index: usize, total: usize, result: &CheckResult);
}

/// When to draw a new proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    every: NonZeroU32,
}

impl RotationPolicy {
    pub fn new(every: NonZeroU32) -> Self {
        Self { every }
    }

    pub fn every(&self) -> NonZeroU32 {
        self.every
    }

    /// Whether a proxy is drawn before the `index`-th check (1-indexed).
    pub fn should_rotate(&self, index: usize) -> bool {
        index == 1 || index % self.every.get() as usize == 0
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::new(NonZeroU32::new(DEFAULT_ROTATE_EVERY).unwrap_or(NonZeroU32::MIN))
    }
}

/// Non-empty list of proxy URLs to draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyPool {
    proxies: Vec<String>,
}

impl ProxyPool {
    /// Returns `None` for an empty list, which means "no proxies".
    pub fn new(proxies: Vec<String>) -> Option<Self> {
        if proxies.is_empty() {
            None
        } else {
            Some(Self { proxies })
        }
    }

    pub fn proxies(&self) -> &[String] {
        &self.proxies
    }

    /// Uniform draw with replacement.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.proxies.choose(rng).map(String::as_str)
    }
}

/// Drives a run over an input list.
pub struct Scheduler<R> {
    policy: RotationPolicy,
    pool: Option<ProxyPool>,
    pacing: Duration,
    rng: R,
}

impl<R: Rng> Scheduler<R> {
    pub fn new(policy: RotationPolicy, pool: Option<ProxyPool>, rng: R) -> Self {
        Self {
            policy,
            pool,
            pacing: DEFAULT_PACING,
            rng,
        }
    }

    /// Override the pause between checks.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Check every input in order, handing each result to `reporter`.
    ///
    /// Per-item failures are ordinary results; the run never stops early.
    pub async fn run<C, P>(
        &mut self,
        inputs: &[String],
        kind: IdentifierKind,
        checker: &C,
        reporter: &mut P,
    ) -> RunSummary
    where
        C: Checker + ?Sized,
        P: Reporter + ?Sized,
    {
        let total = inputs.len();
        let mut summary = RunSummary::default();
        let mut current: Option<String> = None;

        for (offset, value) in inputs.iter().enumerate() {
            let index = offset + 1;

            if let Some(pool) = &self.pool {
                if self.policy.should_rotate(index) {
                    if let Some(proxy) = pool.pick(&mut self.rng) {
                        tracing::debug!(index, proxy, "rotating proxy");
                        reporter.proxy_selected(proxy);
                        current = Some(proxy.to_string());
                        summary.proxy_switches += 1;
                    }
                }
            }

            let result = checker.check(value, kind, current.as_deref()).await;
            summary.record(&result);
            reporter.report(index, total, &result);

            tokio::time::sleep(self.pacing).await;
        }

        summary
    }
}
