use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use shelfsort_core::CancelToken;

use crate::error::CatalogError;
use crate::http::{HttpBackend, HttpRequest, HttpResponse, Sleeper, ThreadSleeper};

/// Retry and rate-limit tuning for a `Transport`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first one.
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles per attempt.
    pub base_backoff: Duration,
    /// Upper bound for computed backoff.
    pub max_backoff: Duration,
    /// Upper bound for a server-supplied `Retry-After`.
    pub max_server_wait: Duration,
    /// Random extra delay added to 5xx/network backoff.
    pub max_jitter: Duration,
    /// Pause voluntarily once the remaining budget drops to this value.
    pub low_budget_threshold: u32,
    pub low_budget_pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            max_server_wait: Duration::from_secs(60),
            max_jitter: Duration::from_millis(250),
            low_budget_threshold: 1,
            low_budget_pause: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff for the given zero-based attempt, capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        self.base_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }
}

/// Counters for one transport's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub requests: u32,
    pub retries: u32,
    pub budget_pauses: u32,
}

/// Sends catalog requests with bounded retry and rate-limit awareness.
///
/// The remaining-budget estimate lives here, so a fresh transport per run
/// starts with no knowledge of the previous run's window.
pub struct Transport {
    backend: Box<dyn HttpBackend>,
    sleeper: Box<dyn Sleeper>,
    policy: RetryPolicy,
    cancel: CancelToken,
    remaining: Option<u32>,
    stats: TransportStats,
}

impl Transport {
    pub fn new(backend: impl HttpBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            sleeper: Box::new(ThreadSleeper),
            policy: RetryPolicy::default(),
            cancel: CancelToken::new(),
            remaining: None,
            stats: TransportStats::default(),
        }
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Retry waits end early with `Cancelled` once this token fires.
    pub fn set_cancel(&mut self, cancel: CancelToken) {
        self.cancel = cancel;
    }

    /// Most recently observed "requests remaining in window".
    pub fn remaining_budget(&self) -> Option<u32> {
        self.remaining
    }

    pub fn stats(&self) -> &TransportStats {
        &self.stats
    }

    /// Send a request, retrying 429/5xx and network failures.
    ///
    /// Any other 4xx returns `AuthOrRequest` immediately. Running out of
    /// attempts returns `TransientApiFailure` with the last status seen.
    pub fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, CatalogError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_status = None;

        for attempt in 0..max_attempts {
            self.stats.requests += 1;
            let has_next = attempt + 1 < max_attempts;

            let wait = match self.backend.execute(request) {
                Ok(resp) => {
                    if let Some(remaining) = resp.ratelimit_remaining {
                        self.remaining = Some(remaining);
                    }
                    if resp.is_success() {
                        self.pause_if_budget_low();
                        return Ok(resp);
                    }
                    if !is_retryable(resp.status) {
                        return Err(CatalogError::AuthOrRequest {
                            status: resp.status,
                            message: body_snippet(&resp.body),
                        });
                    }
                    last_status = Some(resp.status);
                    self.retry_delay(&resp, attempt)
                }
                Err(CatalogError::Network(msg)) => {
                    log::debug!("Network error on {} (attempt {}): {}", request.path, attempt + 1, msg);
                    self.policy.backoff(attempt) + self.policy.jitter()
                }
                Err(e) => return Err(e),
            };

            if has_next {
                log::debug!(
                    "Retrying {} in {:.1}s (attempt {}/{}, last status: {:?})",
                    request.path,
                    wait.as_secs_f64(),
                    attempt + 2,
                    max_attempts,
                    last_status,
                );
                self.sleep_cancellable(wait)?;
                self.stats.retries += 1;
            }
        }

        Err(CatalogError::TransientApiFailure {
            last_status,
            attempts: max_attempts,
        })
    }

    /// Server guidance wins; otherwise exponential backoff, with jitter for
    /// server errors.
    fn retry_delay(&self, resp: &HttpResponse, attempt: u32) -> Duration {
        if let Some(wait) = resp
            .retry_after
            .as_deref()
            .and_then(|v| parse_retry_after(v, Utc::now()))
        {
            if wait > self.policy.max_server_wait {
                log::debug!(
                    "Retry-After of {:.0}s capped at {:.0}s",
                    wait.as_secs_f64(),
                    self.policy.max_server_wait.as_secs_f64()
                );
            }
            return wait.min(self.policy.max_server_wait);
        }
        if resp.status == 429 {
            self.policy.backoff(attempt)
        } else {
            self.policy.backoff(attempt) + self.policy.jitter()
        }
    }

    fn sleep_cancellable(&self, wait: Duration) -> Result<(), CatalogError> {
        if self.cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }
        self.sleeper.sleep(wait, &self.cancel);
        if self.cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }
        Ok(())
    }

    fn pause_if_budget_low(&mut self) {
        if let Some(remaining) = self.remaining
            && remaining <= self.policy.low_budget_threshold
        {
            log::debug!(
                "Rate-limit budget low ({} remaining), pausing {:.1}s",
                remaining,
                self.policy.low_budget_pause.as_secs_f64()
            );
            self.sleeper.sleep(self.policy.low_budget_pause, &self.cancel);
            self.stats.budget_pauses += 1;
        }
    }
}

fn is_retryable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    trimmed.chars().take(200).collect()
}

/// Parse a `Retry-After` value: delta-seconds (integer or fractional) or an
/// HTTP-date. Dates in the past mean "retry now".
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<f64>() {
        if secs < 0.0 {
            return None;
        }
        return Duration::try_from_secs_f64(secs).ok();
    }
    let when = DateTime::parse_from_rfc2822(value).ok()?;
    Some(
        when.with_timezone(&Utc)
            .signed_duration_since(now)
            .to_std()
            .unwrap_or(Duration::ZERO),
    )
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
