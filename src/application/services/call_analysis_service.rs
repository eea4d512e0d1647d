use std::sync::Arc;

use crate::application::ports::{AudioFetchError, AudioFetcher, TranscriptionError};
use crate::domain::{SalesFeedback, TranscriptionProvider};

use super::{
    DistributionOptions, DistributionService, FeedbackError, FeedbackService,
    format_transcription_text,
};

#[derive(Debug, Clone)]
pub struct CallAnalysis {
    pub transcription_text: String,
    pub provider: TranscriptionProvider,
    pub used_fallback: bool,
    pub feedback: SalesFeedback,
    pub model: String,
}

/// Fetch, transcribe with distribution, format, then generate feedback.
pub struct CallAnalysisService {
    audio_fetcher: Arc<dyn AudioFetcher>,
    distribution_service: Arc<DistributionService>,
    feedback_service: Arc<FeedbackService>,
}

impl CallAnalysisService {
    pub fn new(
        audio_fetcher: Arc<dyn AudioFetcher>,
        distribution_service: Arc<DistributionService>,
        feedback_service: Arc<FeedbackService>,
    ) -> Self {
        Self {
            audio_fetcher,
            distribution_service,
            feedback_service,
        }
    }

    #[tracing::instrument(skip(self, file_url, custom_prompt))]
    pub async fn analyze(
        &self,
        file_url: &str,
        file_name: &str,
        custom_prompt: Option<&str>,
    ) -> Result<CallAnalysis, CallAnalysisError> {
        let audio = self.audio_fetcher.fetch(file_url).await?;

        let transcription = self
            .distribution_service
            .transcribe_with_distribution(&audio, file_name, DistributionOptions::default())
            .await?;

        let transcription_text = format_transcription_text(&transcription.result);

        tracing::info!(
            provider = %transcription.provider,
            used_fallback = transcription.used_fallback,
            chars = transcription_text.len(),
            "Call transcribed"
        );

        let feedback = self
            .feedback_service
            .generate(&transcription_text, custom_prompt)
            .await?;

        Ok(CallAnalysis {
            transcription_text,
            provider: transcription.provider,
            used_fallback: transcription.used_fallback,
            feedback,
            model: self.feedback_service.model().to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CallAnalysisError {
    #[error(transparent)]
    Fetch(#[from] AudioFetchError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
}
