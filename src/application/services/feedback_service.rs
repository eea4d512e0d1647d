use std::sync::Arc;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::SalesFeedback;
use crate::infrastructure::observability::sanitize_prompt;

use super::feedback_normalizer::{UnparsableResponse, extract_json_from_response, normalize_feedback};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert sales coach analyzing a sales call transcript. Provide actionable feedback on the salesperson's performance.

Analyze the conversation and respond with a JSON object containing:
- overallScore: A score from 1-10
- summary: A 2-3 sentence overview of the call
- strengths: An array of 3-5 things the salesperson did well
- improvements: An array of 3-5 areas for improvement
- keyMoments: An array of notable moments with { timestamp (optional), speaker, observation }
- metrics: An object with scores (1-10) for:
  - toneProfessionalism
  - activeListening
  - objectionHandling
  - closingTechnique
  - productKnowledge

Focus on specific, actionable feedback with examples from the call.
Respond ONLY with the JSON object, no additional text.";

const USER_MESSAGE_PREFIX: &str =
    "Please analyze the following sales call transcript and provide structured feedback:\n\n";

/// Generates coaching feedback for a formatted transcript.
pub struct FeedbackService {
    llm_client: Arc<dyn LlmClient>,
}

impl FeedbackService {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    pub fn model(&self) -> &str {
        self.llm_client.model()
    }

    pub async fn generate(
        &self,
        transcript: &str,
        custom_prompt: Option<&str>,
    ) -> Result<SalesFeedback, FeedbackError> {
        if transcript.trim().is_empty() {
            return Err(FeedbackError::EmptyTranscript);
        }

        let system_prompt = resolve_system_prompt(custom_prompt);
        let user_message = format!("{}{}", USER_MESSAGE_PREFIX, transcript);

        tracing::debug!(
            model = %self.llm_client.model(),
            custom_prompt = system_prompt != DEFAULT_SYSTEM_PROMPT,
            transcript = %sanitize_prompt(transcript),
            "Requesting sales feedback"
        );

        let content = self
            .llm_client
            .complete(system_prompt, &user_message)
            .await?;

        if content.trim().is_empty() {
            return Err(FeedbackError::EmptyResponse);
        }

        let parsed = extract_json_from_response(&content)?;
        let feedback = normalize_feedback(&parsed)?;

        tracing::info!(
            overall_score = feedback.overall_score,
            key_moments = feedback.key_moments.len(),
            "Sales feedback generated"
        );

        Ok(feedback)
    }
}

/// Custom instructions win unless blank.
pub fn resolve_system_prompt(custom_prompt: Option<&str>) -> &str {
    custom_prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Transcript cannot be empty")]
    EmptyTranscript,
    #[error("model returned an empty response, please try again")]
    EmptyResponse,
    #[error(transparent)]
    UnparsableResponse(#[from] UnparsableResponse),
    #[error("Failed to generate sales feedback: {0}")]
    Llm(#[from] LlmClientError),
}
