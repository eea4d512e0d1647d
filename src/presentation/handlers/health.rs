use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub providers: Vec<String>,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let providers = state
        .distribution_service
        .providers()
        .iter()
        .map(|p| p.to_string())
        .collect();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            providers,
        }),
    )
}
