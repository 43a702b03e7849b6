use thiserror::Error;

/// Failure of a text completion call. Messages never include request credentials.
#[derive(Debug, Error)]
pub enum LLMError {
    /// The provider refused the configured API key (401/403 or no key at all).
    #[error("model provider rejected the credentials")]
    AuthenticationFailed,
    #[error("model provider failed: {0}")]
    ServerError(String),
    #[error("model call timed out")]
    Timeout,
    #[error("model returned no text")]
    EmptyResponse,
    /// Anything else: rejected requests, quota, unreadable responses.
    #[error("model call failed: {0}")]
    ProviderError(String),
}
