//! Error types for booking API sessions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed ({status}): {reason}")]
    AuthenticationFailed { status: u16, reason: String },

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
