use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::ports::{TranscriptionError, TranscriptionOptions};
use crate::application::services::format_transcription_text;
use crate::domain::TranscriptionProvider;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::ApiError;
use super::required;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    #[serde(default)]
    pub audio_file_id: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub diarization: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeResponse {
    pub success: bool,
    pub text: String,
    pub provider: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_file_id: Option<String>,
}

/// Single-provider transcription without distribution or fallback.
#[tracing::instrument(skip(state, request), fields(user_id = %user.0))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<TranscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(file_url), Some(file_name)) =
        (required(request.file_url), required(request.file_name))
    else {
        return Err(ApiError::bad_request(
            "Missing required fields: fileUrl, fileName",
        ));
    };

    let provider = match required(request.provider) {
        Some(raw) => raw
            .parse::<TranscriptionProvider>()
            .map_err(|_| TranscriptionError::UnsupportedProvider(raw.clone()))?,
        None => state
            .distribution_service
            .providers()
            .first()
            .copied()
            .unwrap_or(TranscriptionProvider::Deepgram),
    };

    let audio = state.audio_fetcher.fetch(&file_url).await?;

    let options = TranscriptionOptions {
        language: request.language,
        diarization: request.diarization.unwrap_or(false),
    };

    let timeout = Duration::from_secs(state.settings.transcription.attempt_timeout_secs);
    let call = state
        .dispatcher
        .transcribe(provider, &audio, &file_name, &options);

    let result = tokio::time::timeout(timeout, call)
        .await
        .unwrap_or(Err(TranscriptionError::Timeout {
            provider,
            seconds: timeout.as_secs(),
        }))
        .map_err(|e| {
            tracing::error!(provider = %provider, error = %e, "Transcription failed");
            ApiError::from(e)
        })?;

    Ok((
        StatusCode::OK,
        Json(TranscribeResponse {
            success: true,
            text: format_transcription_text(&result),
            provider: provider.to_string(),
            file_name,
            audio_file_id: request.audio_file_id,
        }),
    ))
}
