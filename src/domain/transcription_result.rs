use serde::{Deserialize, Serialize};

/// Canonical transcription output shared by every provider adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<TranscriptSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<TranscriptWord>>,
}

/// Utterance-level span. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl TranscriptionResult {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            segments: None,
            words: None,
        }
    }

    pub fn has_speaker_labels(&self) -> bool {
        self.segments
            .as_ref()
            .is_some_and(|segments| segments.iter().any(|s| s.speaker.is_some()))
    }
}

/// Uniform diarization label, e.g. `Speaker 0` or `Speaker A`.
pub fn speaker_label(id: impl std::fmt::Display) -> String {
    format!("Speaker {}", id)
}
