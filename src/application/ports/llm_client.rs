use async_trait::async_trait;

#[async_trait]
pub trait LlmClient: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, system_prompt: &str, user_message: &str)
    -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("GROQ_API_KEY environment variable is not set")]
    MissingApiKey,
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),
    #[error("rate limit exceeded, please wait a moment and try again")]
    RateLimited,
    #[error("model not available: {0}")]
    ModelUnavailable(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
