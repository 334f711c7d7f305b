//! In-memory backend and sleeper for offline runs and tests.
//!
//! `ScriptedBackend` answers requests from a queue of canned responses in
//! the order they were pushed and keeps a log of what was asked for.
//! Clones share the same queue and log.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use shelfsort_core::CancelToken;

use crate::error::CatalogError;
use crate::http::{HttpBackend, HttpRequest, HttpResponse, Sleeper};

#[derive(Debug, Default)]
struct ScriptState {
    responses: VecDeque<Result<HttpResponse, String>>,
    requests: Vec<HttpRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, response: HttpResponse) -> &Self {
        self.lock().responses.push_back(Ok(response));
        self
    }

    /// Queue a 200 response with a JSON body.
    pub fn push_json(&self, body: serde_json::Value) -> &Self {
        self.push(HttpResponse::new(200, body.to_string()))
    }

    pub fn push_status(&self, status: u16) -> &Self {
        self.push(HttpResponse::new(status, ""))
    }

    /// Queue a connection-level failure.
    pub fn push_network_error(&self, message: &str) -> &Self {
        self.lock().responses.push_back(Err(message.to_string()));
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Responses still queued.
    pub fn pending(&self) -> usize {
        self.lock().responses.len()
    }
}

impl HttpBackend for ScriptedBackend {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CatalogError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        match state.responses.pop_front() {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(msg)) => Err(CatalogError::Network(msg)),
            None => Ok(HttpResponse::new(
                404,
                format!("no scripted response for {}", request.path),
            )),
        }
    }
}

/// Records requested sleeps instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration, _cancel: &CancelToken) {
        self.sleeps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(duration);
    }
}
