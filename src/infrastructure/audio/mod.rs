mod assemblyai_engine;
mod audio_format;
mod deepgram_engine;
mod mock_transcription_engine;
mod transcription_engine_factory;

pub use assemblyai_engine::{
    AssemblyAiEngine, DEFAULT_ASSEMBLYAI_BASE_URL, DEFAULT_MAX_POLL_DURATION, DEFAULT_POLL_INTERVAL,
};
pub use audio_format::audio_mime_type;
pub use deepgram_engine::{DEFAULT_DEEPGRAM_BASE_URL, DEFAULT_DEEPGRAM_MODEL, DeepgramEngine};
pub use mock_transcription_engine::MockTranscriptionEngine;
pub use transcription_engine_factory::TranscriptionEngineFactory;
