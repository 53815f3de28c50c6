//! Error types shared across the highlight pipeline

/// Result type for highlight-cards operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Error types for highlight-cards operations
#[derive(thiserror::Error, Debug)]
pub enum HighlightError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Unsupported transcript format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid video URL: {0}")]
    InvalidVideoUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Summarizer error: {0}")]
    Summarizer(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
