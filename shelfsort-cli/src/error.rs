use thiserror::Error;

use shelfsort_catalog::CatalogError;
use shelfsort_export::ExportError;
use shelfsort_lib::ShelfError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Invalid flags, settings or credentials setup
    #[error("Config error: {0}")]
    Config(String),

    /// The catalog rejected the token or the request
    #[error("Request rejected: {0}")]
    Auth(String),

    /// Rate limiting or an outage outlasted the retries
    #[error("Catalog unavailable: {0}")]
    Transient(String),

    #[error("Cancelled")]
    Cancelled,

    /// Writing output files failed
    #[error("Write error: {0}")]
    Export(ExportError),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Process exit status for this error.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Auth(_) => 3,
            Self::Transient(_) => 4,
            Self::Cancelled => 130,
            Self::Io(_) | Self::Export(_) | Self::Other(_) => 1,
        }
    }

    /// Follow-up advice printed under the error, if any.
    pub(crate) fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Auth(_) => Some("Check the token with 'shelfsort config test'."),
            Self::Transient(_) => Some("The catalog is busy or down; try again later."),
            Self::Config(_) => Some("See 'shelfsort config show' for resolved settings."),
            _ => None,
        }
    }
}

impl From<ShelfError> for CliError {
    fn from(err: ShelfError) -> Self {
        if err.is_transient() {
            return Self::Transient(err.to_string());
        }
        if err.is_auth_or_request() {
            return Self::Auth(err.to_string());
        }
        match err {
            ShelfError::Configuration(msg) => Self::Config(msg),
            ShelfError::Settings(msg) => Self::Config(msg),
            ShelfError::Cancelled => Self::Cancelled,
            ShelfError::Io(e) => Self::Io(e),
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        ShelfError::from(err).into()
    }
}

impl From<ExportError> for CliError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Cancelled => Self::Cancelled,
            ExportError::NotADirectory(path) => {
                Self::Config(format!("output path {} is not a directory", path))
            }
            other => Self::Export(other),
        }
    }
}
