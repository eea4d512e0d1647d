mod analyze_call;
mod api_error;
mod health;
mod transcribe;

pub use analyze_call::{AnalyzeCallRequest, AnalyzeCallResponse, analyze_call_handler};
pub use api_error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use transcribe::{TranscribeRequest, TranscribeResponse, transcribe_handler};

/// Treats blank strings the same as absent fields.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
