mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AssemblyAiSettings, DeepgramSettings, LlmSettings, LoggingSettings, ServerSettings, Settings,
    StorageSettings, TranscriptionSettings,
};
