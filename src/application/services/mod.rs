mod call_analysis_service;
mod distribution_service;
pub mod feedback_normalizer;
mod feedback_service;
mod transcript_formatter;
mod transcription_dispatcher;

pub use call_analysis_service::{CallAnalysis, CallAnalysisError, CallAnalysisService};
pub use distribution_service::{
    DistributedTranscription, DistributionOptions, DistributionService, RoundRobinCursor,
};
pub use feedback_normalizer::{UnparsableResponse, extract_json_from_response, normalize_feedback};
pub use feedback_service::{
    DEFAULT_SYSTEM_PROMPT, FeedbackError, FeedbackService, resolve_system_prompt,
};
pub use transcript_formatter::format_transcription_text;
pub use transcription_dispatcher::{TranscriptionDispatcher, file_extension, validate_audio};
