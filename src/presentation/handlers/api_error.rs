use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{AudioFetchError, TranscriptionError};
use crate::application::services::{CallAnalysisError, FeedbackError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Failure translated for the HTTP boundary.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                success: false,
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<TranscriptionError> for ApiError {
    fn from(error: TranscriptionError) -> Self {
        let status = match &error {
            TranscriptionError::SizeExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            TranscriptionError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            TranscriptionError::UnsupportedProvider(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error.to_string())
    }
}

impl From<AudioFetchError> for ApiError {
    fn from(error: AudioFetchError) -> Self {
        match error {
            AudioFetchError::InvalidUrl(_) | AudioFetchError::DisallowedHost(_) => {
                Self::bad_request("Invalid file URL")
            }
            AudioFetchError::TooLarge { .. } => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, error.to_string())
            }
            AudioFetchError::RequestFailed(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "Failed to fetch file from storage")
            }
        }
    }
}

impl From<FeedbackError> for ApiError {
    fn from(error: FeedbackError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
    }
}

impl From<CallAnalysisError> for ApiError {
    fn from(error: CallAnalysisError) -> Self {
        match error {
            CallAnalysisError::Fetch(e) => e.into(),
            CallAnalysisError::Transcription(e) => e.into(),
            CallAnalysisError::Feedback(e) => e.into(),
        }
    }
}
