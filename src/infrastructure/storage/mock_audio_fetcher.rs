use crate::application::ports::{AudioFetchError, AudioFetcher};

/// Serves fixed bytes for any URL on the allowed host.
pub struct MockAudioFetcher {
    data: Vec<u8>,
    allowed_host_suffix: String,
}

impl MockAudioFetcher {
    pub fn new(data: Vec<u8>, allowed_host_suffix: impl Into<String>) -> Self {
        Self {
            data,
            allowed_host_suffix: allowed_host_suffix.into(),
        }
    }
}

#[async_trait::async_trait]
impl AudioFetcher for MockAudioFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AudioFetchError> {
        super::validate_storage_url(url, &self.allowed_host_suffix)?;
        Ok(self.data.clone())
    }
}
