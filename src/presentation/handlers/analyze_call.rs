use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::domain::SalesFeedback;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::ApiError;
use super::required;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCallRequest {
    #[serde(default)]
    pub audio_file_id: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCallResponse {
    pub success: bool,
    pub transcription_text: String,
    pub provider: String,
    pub used_fallback: bool,
    pub audio_file_id: String,
    pub file_name: String,
    pub feedback: SalesFeedback,
    pub model: String,
}

#[tracing::instrument(skip(state, request), fields(user_id = %user.0))]
pub async fn analyze_call_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<AnalyzeCallRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(audio_file_id), Some(file_url), Some(file_name)) = (
        required(request.audio_file_id),
        required(request.file_url),
        required(request.file_name),
    ) else {
        return Err(ApiError::bad_request(
            "Missing required fields: audioFileId, fileUrl, fileName",
        ));
    };

    let analysis = state
        .call_analysis_service
        .analyze(&file_url, &file_name, request.custom_prompt.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, audio_file_id = %audio_file_id, "Call analysis failed");
            ApiError::from(e)
        })?;

    tracing::info!(
        audio_file_id = %audio_file_id,
        provider = %analysis.provider,
        used_fallback = analysis.used_fallback,
        overall_score = analysis.feedback.overall_score,
        "Call analyzed"
    );

    Ok((
        StatusCode::OK,
        Json(AnalyzeCallResponse {
            success: true,
            transcription_text: analysis.transcription_text,
            provider: analysis.provider.to_string(),
            used_fallback: analysis.used_fallback,
            audio_file_id,
            file_name,
            feedback: analysis.feedback,
            model: analysis.model,
        }),
    ))
}
