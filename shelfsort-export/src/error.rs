/// Errors that can occur while rendering or writing shelf files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON writing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output directory {0} is not a directory")]
    NotADirectory(String),

    #[error("Cancelled before writing")]
    Cancelled,
}
