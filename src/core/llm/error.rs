//! LLM error types.

/// Result type alias using [`LLMError`].
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors returned by text-generation providers.
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LLMError::Timeout
        } else if err.is_decode() {
            LLMError::InvalidResponse(err.to_string())
        } else {
            LLMError::Http(err.to_string())
        }
    }
}
