use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Request cancelled")]
    Cancelled,
}

impl FeedbackError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FeedbackError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
