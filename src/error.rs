//! Error handling for the job application form

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobFormError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {detail}")]
    HttpStatus { status: u16, detail: String },

    #[error("Malformed response body: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, JobFormError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for JobFormError {
    fn from(err: anyhow::Error) -> Self {
        JobFormError::InvalidInput(err.to_string())
    }
}

impl From<reqwest::Error> for JobFormError {
    fn from(err: reqwest::Error) -> Self {
        JobFormError::Network(err.to_string())
    }
}
