use thiserror::Error;

/// Errors that can occur when interacting with the completions API
#[derive(Error, Debug)]
pub enum CompletionApiError {
    /// No API key was configured or found in the environment
    #[error("Missing API key: set GROQ_API_KEY or configure generation.api_key")]
    MissingApiKey,

    /// Invalid request parameters or malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed due to invalid or missing credentials
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded, retry after waiting
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// API server encountered an internal error
    #[error("API server error: {0}")]
    ServerError(String),

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization or deserialization error
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The API answered successfully but returned no content
    #[error("Empty response from completions API")]
    EmptyResponse,

    /// Unknown error occurred
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl CompletionApiError {
    /// Returns true if this error is transient and should be retried
    ///
    /// Transient errors include rate limits, server errors (5xx), and
    /// network failures. Credential and request errors are permanent.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CompletionApiError::RateLimitExceeded
                | CompletionApiError::ServerError(_)
                | CompletionApiError::NetworkError(_)
        )
    }

    /// Create error from HTTP status code and response body
    ///
    /// - 400: invalid request
    /// - 401, 403: authentication failed
    /// - 429: rate limit exceeded
    /// - 5xx: server error
    /// - other: unknown error
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => CompletionApiError::InvalidRequest(body),
            401 | 403 => CompletionApiError::AuthenticationFailed(body),
            429 => CompletionApiError::RateLimitExceeded,
            s if (500..600).contains(&s) => CompletionApiError::ServerError(body),
            _ => CompletionApiError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }
}
