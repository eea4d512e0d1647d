use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, redirect};

use crate::application::ports::{AudioFetchError, AudioFetcher};

pub const DEFAULT_ALLOWED_HOST_SUFFIX: &str = ".convex.cloud";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

const MEGABYTE: u64 = 1024 * 1024;

/// Downloads audio over HTTP(S), restricted to the object-storage host.
///
/// Redirects are not followed, so every byte comes from a host that passed
/// [`validate_storage_url`].
pub struct HttpAudioFetcher {
    client: Client,
    allowed_host_suffix: String,
    max_bytes: u64,
}

impl HttpAudioFetcher {
    pub fn new(
        allowed_host_suffix: impl Into<String>,
        timeout: Duration,
        max_bytes: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            allowed_host_suffix: allowed_host_suffix.into(),
            max_bytes,
        })
    }

    pub fn validate_url(&self, raw: &str) -> Result<Url, AudioFetchError> {
        validate_storage_url(raw, &self.allowed_host_suffix)
    }

    fn too_large(&self) -> AudioFetchError {
        AudioFetchError::TooLarge {
            limit_mb: self.max_bytes / MEGABYTE,
        }
    }
}

pub fn validate_storage_url(raw: &str, allowed_host_suffix: &str) -> Result<Url, AudioFetchError> {
    let url = Url::parse(raw).map_err(|e| AudioFetchError::InvalidUrl(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AudioFetchError::InvalidUrl(format!(
            "unsupported scheme {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| AudioFetchError::InvalidUrl("missing host".to_string()))?;

    if !host.ends_with(allowed_host_suffix) {
        return Err(AudioFetchError::DisallowedHost(host.to_string()));
    }

    Ok(url)
}

#[async_trait]
impl AudioFetcher for HttpAudioFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AudioFetchError> {
        let url = self.validate_url(url)?;

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AudioFetchError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AudioFetchError::RequestFailed(format!(
                "status {}",
                response.status()
            )));
        }

        if response
            .content_length()
            .is_some_and(|length| length > self.max_bytes)
        {
            tracing::warn!(
                content_length = ?response.content_length(),
                max_bytes = self.max_bytes,
                "Rejected oversized audio download"
            );
            return Err(self.too_large());
        }

        let capacity = response.content_length().unwrap_or(0).min(self.max_bytes) as usize;
        let mut body = Vec::with_capacity(capacity);

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AudioFetchError::RequestFailed(e.to_string()))?
        {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                tracing::warn!(max_bytes = self.max_bytes, "Audio stream exceeded size limit");
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(bytes = body.len(), "Audio fetched from storage");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_storage_host_when_validating_then_url_is_accepted() {
        let url = validate_storage_url(
            "https://happy-otter-123.convex.cloud/api/storage/abc",
            DEFAULT_ALLOWED_HOST_SUFFIX,
        );

        assert!(url.is_ok());
    }

    #[test]
    fn given_internal_host_when_validating_then_url_is_rejected() {
        let result = validate_storage_url(
            "http://169.254.169.254/latest/meta-data",
            DEFAULT_ALLOWED_HOST_SUFFIX,
        );

        assert!(matches!(result, Err(AudioFetchError::DisallowedHost(_))));
    }

    #[test]
    fn given_lookalike_host_when_validating_then_url_is_rejected() {
        let result = validate_storage_url(
            "https://convex.cloud.attacker.example/file",
            DEFAULT_ALLOWED_HOST_SUFFIX,
        );

        assert!(matches!(result, Err(AudioFetchError::DisallowedHost(_))));
    }

    #[test]
    fn given_garbage_when_validating_then_url_is_invalid() {
        let result = validate_storage_url("not a url", DEFAULT_ALLOWED_HOST_SUFFIX);

        assert!(matches!(result, Err(AudioFetchError::InvalidUrl(_))));
    }
}
