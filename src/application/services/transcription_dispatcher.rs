use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError, TranscriptionOptions};
use crate::domain::{TranscriptionProvider, TranscriptionResult, config_for};

/// Validates audio against a provider's capabilities and routes it to that provider's engine.
pub struct TranscriptionDispatcher {
    engines: HashMap<TranscriptionProvider, Arc<dyn TranscriptionEngine>>,
}

impl TranscriptionDispatcher {
    pub fn new(engines: Vec<Arc<dyn TranscriptionEngine>>) -> Self {
        let engines = engines
            .into_iter()
            .map(|engine| (engine.provider(), engine))
            .collect();
        Self { engines }
    }

    pub fn providers(&self) -> Vec<TranscriptionProvider> {
        TranscriptionProvider::ALL
            .into_iter()
            .filter(|p| self.engines.contains_key(p))
            .collect()
    }

    pub async fn transcribe(
        &self,
        provider: TranscriptionProvider,
        audio_data: &[u8],
        file_name: &str,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        validate_audio(provider, audio_data.len() as u64, file_name)?;

        let engine = self
            .engines
            .get(&provider)
            .ok_or_else(|| TranscriptionError::UnsupportedProvider(provider.to_string()))?;

        tracing::debug!(
            provider = %provider,
            bytes = audio_data.len(),
            file_name = %file_name,
            language = %options.language(),
            diarization = options.diarization,
            "Dispatching audio to transcription engine"
        );

        engine.transcribe(audio_data, file_name, options).await
    }
}

pub fn validate_audio(
    provider: TranscriptionProvider,
    size_bytes: u64,
    file_name: &str,
) -> Result<(), TranscriptionError> {
    let config = config_for(provider);

    if size_bytes > config.max_file_size {
        return Err(TranscriptionError::SizeExceeded {
            provider,
            limit_mb: config.max_file_size_mb(),
        });
    }

    if let Some(extension) = file_extension(file_name) {
        if !config.supports_format(&extension) {
            return Err(TranscriptionError::UnsupportedFormat {
                provider,
                extension,
                supported: config.supported_formats.join(", "),
            });
        }
    }

    Ok(())
}

/// Lower-cased text after the last `.`, if the name has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_lowercase())
}
