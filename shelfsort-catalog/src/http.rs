//! The seam between the retry logic and the actual HTTP stack.
//!
//! `Transport` only sees `HttpBackend` and `Sleeper`, so production code
//! plugs in reqwest and `std::thread::sleep` while tests plug in scripted
//! responses and a recording sleeper.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use shelfsort_core::CancelToken;

use crate::credentials::Credentials;
use crate::error::CatalogError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const RATELIMIT_REMAINING_HEADER: &str = "X-Discogs-Ratelimit-Remaining";
const CANCEL_POLL: Duration = Duration::from_millis(250);

/// A GET request relative to the backend's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Value of a query parameter, if present.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The parts of an HTTP response the catalog client cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Raw `Retry-After` header value.
    pub retry_after: Option<String>,
    /// Requests left in the current rate-limit window.
    pub ratelimit_remaining: Option<u32>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            ratelimit_remaining: None,
            body: body.into(),
        }
    }

    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }

    pub fn with_remaining(mut self, remaining: u32) -> Self {
        self.ratelimit_remaining = Some(remaining);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Executes a single HTTP request without any retry logic.
///
/// Connection-level failures are reported as `CatalogError::Network` so the
/// transport can retry them.
pub trait HttpBackend: Send {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CatalogError>;
}

/// Blocks the calling thread between retries.
///
/// Implementations may return early once `cancel` fires.
pub trait Sleeper: Send {
    fn sleep(&self, duration: Duration, cancel: &CancelToken);
}

/// Real wall-clock sleeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration, cancel: &CancelToken) {
        let mut left = duration;
        while !left.is_zero() && !cancel.is_cancelled() {
            let step = left.min(CANCEL_POLL);
            std::thread::sleep(step);
            left -= step;
        }
    }
}

/// Blocking reqwest client pre-configured with Discogs auth headers.
pub struct ReqwestBackend {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ReqwestBackend {
    pub fn new(creds: &Credentials, base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Discogs token={}", creds.token))
            .map_err(|e| CatalogError::config(format!("Token is not a valid header value: {e}")))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::blocking::Client::builder()
            .user_agent(creds.user_agent.clone())
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl HttpBackend for ReqwestBackend {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CatalogError> {
        let url = format!("{}{}", self.base_url, request.path);
        let resp = self
            .http
            .get(&url)
            .query(&request.query)
            .send()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let ratelimit_remaining = resp
            .headers()
            .get(RATELIMIT_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok());

        let body = resp
            .text()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            retry_after,
            ratelimit_remaining,
            body,
        })
    }
}
