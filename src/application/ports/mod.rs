mod audio_fetcher;
mod llm_client;
mod transcription_engine;

pub use audio_fetcher::{AudioFetchError, AudioFetcher};
pub use llm_client::{LlmClient, LlmClientError};
pub use transcription_engine::{
    DEFAULT_LANGUAGE, TranscriptionEngine, TranscriptionError, TranscriptionOptions,
};
