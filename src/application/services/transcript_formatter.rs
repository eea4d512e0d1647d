use crate::domain::TranscriptionResult;

const UNKNOWN_SPEAKER: &str = "Unknown";

/// Renders a transcription as display text, speaker-attributed when any segment carries a label.
pub fn format_transcription_text(result: &TranscriptionResult) -> String {
    match result.segments.as_deref() {
        Some(segments) if result.has_speaker_labels() => segments
            .iter()
            .map(|segment| {
                let speaker = segment.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER);
                format!("[{}]: {}", speaker, segment.text)
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        _ => result.text.clone(),
    }
}
