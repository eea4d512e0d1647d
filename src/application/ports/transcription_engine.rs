use async_trait::async_trait;

use crate::domain::{TranscriptionProvider, TranscriptionResult};

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptionOptions {
    pub language: Option<String>,
    pub diarization: bool,
}

impl TranscriptionOptions {
    pub fn language(&self) -> &str {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    fn provider(&self) -> TranscriptionProvider;

    async fn transcribe(
        &self,
        audio_data: &[u8],
        file_name: &str,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("File size exceeds maximum for {provider}: {limit_mb}MB")]
    SizeExceeded {
        provider: TranscriptionProvider,
        limit_mb: u64,
    },
    #[error("File format .{extension} not supported by {provider}. Supported: {supported}")]
    UnsupportedFormat {
        provider: TranscriptionProvider,
        extension: String,
        supported: String,
    },
    #[error("Unknown provider: {0}")]
    UnsupportedProvider(String),
    #[error("missing credential for {provider}: set {variable}")]
    MissingCredential {
        provider: TranscriptionProvider,
        variable: &'static str,
    },
    #[error("{provider} error: {message}")]
    ProviderError {
        provider: TranscriptionProvider,
        message: String,
    },
    #[error("{provider} did not respond within {seconds}s")]
    Timeout {
        provider: TranscriptionProvider,
        seconds: u64,
    },
    #[error(
        "All transcription providers failed. Primary ({primary}): {primary_error}. Fallback ({fallback}): {fallback_error}."
    )]
    AllProvidersFailed {
        primary: TranscriptionProvider,
        primary_error: String,
        fallback: TranscriptionProvider,
        fallback_error: String,
    },
}

impl TranscriptionError {
    pub fn provider_error(provider: TranscriptionProvider, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider,
            message: message.into(),
        }
    }

    /// Rejected before any network call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::SizeExceeded { .. } | Self::UnsupportedFormat { .. }
        )
    }

    /// Not retryable without operator intervention.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential { .. } | Self::UnsupportedProvider(_)
        )
    }
}
