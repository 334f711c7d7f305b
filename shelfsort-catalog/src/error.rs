/// Errors that can occur while talking to the catalog API.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection-level failure (DNS, refused, timeout). Retryable.
    #[error("Network error: {0}")]
    Network(String),

    /// Credential rejected or request malformed. Never retried.
    #[error("Catalog rejected the request (HTTP {status}): {message}")]
    AuthOrRequest { status: u16, message: String },

    /// 429/5xx/network failures persisted through every retry.
    #[error(
        "Catalog unavailable after {attempts} attempts (last status: {})",
        status_label(.last_status)
    )]
    TransientApiFailure {
        last_status: Option<u16>,
        attempts: u32,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {code}"),
        None => "no response".to_string(),
    }
}

impl CatalogError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn decode(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: msg.into(),
        }
    }

    /// True for failures worth retrying later (rate limiting, outages).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientApiFailure { .. } | Self::Network(_))
    }

    /// True when the credential itself was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthOrRequest {
                status: 401 | 403,
                ..
            }
        )
    }
}
