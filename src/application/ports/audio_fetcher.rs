use async_trait::async_trait;

/// Downloads an uploaded audio blob from object storage.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AudioFetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioFetchError {
    #[error("invalid file URL: {0}")]
    InvalidUrl(String),
    #[error("file URL host not allowed: {0}")]
    DisallowedHost(String),
    #[error("File size exceeds maximum download size: {limit_mb}MB")]
    TooLarge { limit_mb: u64 },
    #[error("failed to fetch file from storage: {0}")]
    RequestFailed(String),
}
