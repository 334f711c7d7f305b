use shelfsort_catalog::CatalogError;
use thiserror::Error;

/// Errors that can end a shelf-sorting run.
#[derive(Debug, Error)]
pub enum ShelfError {
    /// Rejected by validation before any network call.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Catalog(CatalogError),

    #[error("Cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file error: {0}")]
    Settings(String),
}

impl From<CatalogError> for ShelfError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Cancelled => Self::Cancelled,
            CatalogError::Config(msg) => Self::Configuration(msg),
            other => Self::Catalog(other),
        }
    }
}

impl ShelfError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    /// Rate limiting or an outage outlasted the retry budget.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Catalog(e) if e.is_transient())
    }

    /// The catalog rejected the credential or the request itself.
    pub fn is_auth_or_request(&self) -> bool {
        matches!(self, Self::Catalog(CatalogError::AuthOrRequest { .. }))
    }
}
