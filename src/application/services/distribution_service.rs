use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::Serialize;

use crate::application::ports::{TranscriptionError, TranscriptionOptions};
use crate::domain::{TranscriptionProvider, TranscriptionResult};

use super::TranscriptionDispatcher;

/// Process-wide round-robin position over an ordered provider list.
#[derive(Debug, Default)]
pub struct RoundRobinCursor {
    index: AtomicUsize,
}

impl RoundRobinCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current position and moves to the next one in a single atomic step.
    pub fn advance(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self
            .index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
        {
            Ok(previous) | Err(previous) => previous % len,
        }
    }

    pub fn current(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.index.store(0, Ordering::Release);
    }
}

#[derive(Debug, Clone, Default)]
pub struct DistributionOptions {
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributedTranscription {
    pub result: TranscriptionResult,
    pub provider: TranscriptionProvider,
    pub used_fallback: bool,
}

/// Spreads transcription load across providers and retries once on the next provider when the
/// primary fails.
pub struct DistributionService {
    dispatcher: Arc<TranscriptionDispatcher>,
    providers: Vec<TranscriptionProvider>,
    cursor: RoundRobinCursor,
    attempt_timeout: Duration,
}

impl DistributionService {
    pub fn new(
        dispatcher: Arc<TranscriptionDispatcher>,
        providers: Vec<TranscriptionProvider>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            dispatcher,
            providers,
            cursor: RoundRobinCursor::new(),
            attempt_timeout,
        }
    }

    pub fn providers(&self) -> &[TranscriptionProvider] {
        &self.providers
    }

    /// Picks the primary for this call and advances the shared cursor.
    pub fn next_provider(&self) -> Result<TranscriptionProvider, TranscriptionError> {
        if self.providers.is_empty() {
            return Err(TranscriptionError::UnsupportedProvider(
                "no transcription providers configured".to_string(),
            ));
        }
        let index = self.cursor.advance(self.providers.len());
        Ok(self.providers[index])
    }

    /// Next distinct provider in the ring after `primary`.
    pub fn fallback_for(&self, primary: TranscriptionProvider) -> Option<TranscriptionProvider> {
        let position = self.providers.iter().position(|p| *p == primary)?;
        let len = self.providers.len();
        (1..len)
            .map(|offset| self.providers[(position + offset) % len])
            .find(|candidate| *candidate != primary)
    }

    pub fn current_index(&self) -> usize {
        self.cursor.current()
    }

    pub fn reset(&self) {
        self.cursor.reset();
    }

    pub async fn transcribe_with_distribution(
        &self,
        audio_data: &[u8],
        file_name: &str,
        options: DistributionOptions,
    ) -> Result<DistributedTranscription, TranscriptionError> {
        let primary = self.next_provider()?;
        let fallback = self.fallback_for(primary);

        let transcription_options = TranscriptionOptions {
            language: options.language,
            diarization: true,
        };

        tracing::debug!(
            primary = %primary,
            fallback = ?fallback.map(|p| p.as_str()),
            "Selected transcription providers"
        );

        let primary_error = match self
            .attempt(primary, audio_data, file_name, &transcription_options)
            .await
        {
            Ok(result) => {
                return Ok(DistributedTranscription {
                    result,
                    provider: primary,
                    used_fallback: false,
                });
            }
            Err(e) => e,
        };

        tracing::warn!(
            provider = %primary,
            validation_error = primary_error.is_validation(),
            configuration_error = primary_error.is_configuration(),
            error = %primary_error,
            "Primary transcription provider failed"
        );

        let Some(fallback) = fallback else {
            return Err(primary_error);
        };

        match self
            .attempt(fallback, audio_data, file_name, &transcription_options)
            .await
        {
            Ok(result) => {
                tracing::info!(
                    provider = %fallback,
                    used_fallback = true,
                    "Transcription recovered on fallback provider"
                );
                Ok(DistributedTranscription {
                    result,
                    provider: fallback,
                    used_fallback: true,
                })
            }
            Err(fallback_error) => {
                tracing::error!(
                    primary = %primary,
                    fallback = %fallback,
                    primary_error = %primary_error,
                    fallback_error = %fallback_error,
                    "All transcription providers failed"
                );
                Err(TranscriptionError::AllProvidersFailed {
                    primary,
                    primary_error: primary_error.to_string(),
                    fallback,
                    fallback_error: fallback_error.to_string(),
                })
            }
        }
    }

    async fn attempt(
        &self,
        provider: TranscriptionProvider,
        audio_data: &[u8],
        file_name: &str,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let call = self
            .dispatcher
            .transcribe(provider, audio_data, file_name, options);

        match tokio::time::timeout(self.attempt_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(TranscriptionError::Timeout {
                provider,
                seconds: self.attempt_timeout.as_secs(),
            }),
        }
    }
}
