use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{AudioFetcher, LlmClient, TranscriptionEngine};
use crate::application::services::{
    CallAnalysisService, DistributionService, FeedbackService, TranscriptionDispatcher,
};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub call_analysis_service: Arc<CallAnalysisService>,
    pub distribution_service: Arc<DistributionService>,
    pub dispatcher: Arc<TranscriptionDispatcher>,
    pub audio_fetcher: Arc<dyn AudioFetcher>,
    pub settings: Settings,
}

impl AppState {
    /// Wires services over the given adapters.
    pub fn new(
        settings: Settings,
        engines: Vec<Arc<dyn TranscriptionEngine>>,
        llm_client: Arc<dyn LlmClient>,
        audio_fetcher: Arc<dyn AudioFetcher>,
    ) -> Self {
        let dispatcher = Arc::new(TranscriptionDispatcher::new(engines));
        let distribution_service = Arc::new(DistributionService::new(
            Arc::clone(&dispatcher),
            dispatcher.providers(),
            Duration::from_secs(settings.transcription.attempt_timeout_secs),
        ));
        let feedback_service = Arc::new(FeedbackService::new(llm_client));
        let call_analysis_service = Arc::new(CallAnalysisService::new(
            Arc::clone(&audio_fetcher),
            Arc::clone(&distribution_service),
            feedback_service,
        ));

        Self {
            call_analysis_service,
            distribution_service,
            dispatcher,
            audio_fetcher,
            settings,
        }
    }
}
