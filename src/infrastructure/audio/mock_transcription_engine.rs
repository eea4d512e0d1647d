use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError, TranscriptionOptions};
use crate::domain::{TranscriptionProvider, TranscriptionResult};

/// Scripted engine that records how it was called.
pub struct MockTranscriptionEngine {
    provider: TranscriptionProvider,
    outcome: Result<TranscriptionResult, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_options: Mutex<Option<TranscriptionOptions>>,
}

impl MockTranscriptionEngine {
    pub fn succeeding(provider: TranscriptionProvider, result: TranscriptionResult) -> Self {
        Self {
            provider,
            outcome: Ok(result),
            delay: None,
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn failing(provider: TranscriptionProvider, message: impl Into<String>) -> Self {
        Self {
            provider,
            outcome: Err(message.into()),
            delay: None,
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<TranscriptionOptions> {
        self.last_options
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }
}

#[async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    fn provider(&self) -> TranscriptionProvider {
        self.provider
    }

    async fn transcribe(
        &self,
        _audio_data: &[u8],
        _file_name: &str,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_options.lock() {
            *last = Some(options.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.outcome
            .clone()
            .map_err(|message| TranscriptionError::provider_error(self.provider, message))
    }
}
