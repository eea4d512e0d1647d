use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::TranscriptionEngine;
use crate::domain::TranscriptionProvider;
use crate::presentation::config::TranscriptionSettings;

use super::assemblyai_engine::AssemblyAiEngine;
use super::deepgram_engine::DeepgramEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        provider: TranscriptionProvider,
        settings: &TranscriptionSettings,
    ) -> Arc<dyn TranscriptionEngine> {
        match provider {
            TranscriptionProvider::Deepgram => {
                let deepgram = &settings.deepgram;
                if deepgram.api_key.is_none() {
                    tracing::warn!(
                        variable = provider.credential_variable(),
                        "Deepgram credential missing, calls will fail"
                    );
                }
                Arc::new(DeepgramEngine::new(
                    deepgram.api_key.clone(),
                    Some(deepgram.base_url.clone()),
                    Some(deepgram.model.clone()),
                ))
            }
            TranscriptionProvider::AssemblyAi => {
                let assemblyai = &settings.assemblyai;
                if assemblyai.api_key.is_none() {
                    tracing::warn!(
                        variable = provider.credential_variable(),
                        "AssemblyAI credential missing, calls will fail"
                    );
                }
                Arc::new(AssemblyAiEngine::new(
                    assemblyai.api_key.clone(),
                    Some(assemblyai.base_url.clone()),
                    Some(Duration::from_millis(assemblyai.poll_interval_ms)),
                )
                .with_max_poll_duration(Duration::from_secs(settings.attempt_timeout_secs)))
            }
        }
    }

    /// One engine per provider, in distribution order.
    pub fn create_all(settings: &TranscriptionSettings) -> Vec<Arc<dyn TranscriptionEngine>> {
        TranscriptionProvider::ALL
            .into_iter()
            .map(|provider| Self::create(provider, settings))
            .collect()
    }
}
