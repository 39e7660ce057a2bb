use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
