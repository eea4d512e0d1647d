mod provider_config;
mod sales_feedback;
mod transcription_provider;
mod transcription_result;
mod user_id;

pub use provider_config::{ProviderConfig, config_for, largest_max_file_size};
pub use sales_feedback::{FeedbackMetrics, KeyMoment, SalesFeedback};
pub use transcription_provider::TranscriptionProvider;
pub use transcription_result::{
    TranscriptSegment, TranscriptWord, TranscriptionResult, speaker_label,
};
pub use user_id::UserId;
