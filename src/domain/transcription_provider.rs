use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Speech-to-text vendors the service can route audio to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    Deepgram,
    #[serde(rename = "assemblyai")]
    AssemblyAi,
}

impl TranscriptionProvider {
    /// Distribution order used by the round-robin selector.
    pub const ALL: [TranscriptionProvider; 2] = [
        TranscriptionProvider::Deepgram,
        TranscriptionProvider::AssemblyAi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionProvider::Deepgram => "deepgram",
            TranscriptionProvider::AssemblyAi => "assemblyai",
        }
    }

    /// Environment variable conventionally holding this provider's API key.
    pub fn credential_variable(&self) -> &'static str {
        match self {
            TranscriptionProvider::Deepgram => "DEEPGRAM_API_KEY",
            TranscriptionProvider::AssemblyAi => "ASSEMBLYAI_API_KEY",
        }
    }
}

impl FromStr for TranscriptionProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deepgram" => Ok(TranscriptionProvider::Deepgram),
            "assemblyai" => Ok(TranscriptionProvider::AssemblyAi),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

impl fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
