use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError, TranscriptionOptions};
use crate::domain::{
    TranscriptSegment, TranscriptWord, TranscriptionProvider, TranscriptionResult, speaker_label,
};

use super::audio_format::audio_mime_type;

const PROVIDER: TranscriptionProvider = TranscriptionProvider::Deepgram;
pub const DEFAULT_DEEPGRAM_BASE_URL: &str = "https://api.deepgram.com";
pub const DEFAULT_DEEPGRAM_MODEL: &str = "nova-3";

/// Single-call prerecorded transcription against Deepgram's `/v1/listen`.
pub struct DeepgramEngine {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl DeepgramEngine {
    pub fn new(api_key: Option<String>, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_DEEPGRAM_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_DEEPGRAM_MODEL.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ListenResponse {
    results: Option<ListenResults>,
}

#[derive(Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<Channel>,
    utterances: Option<Vec<Utterance>>,
}

#[derive(Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Deserialize)]
struct Alternative {
    transcript: String,
    words: Option<Vec<Word>>,
}

#[derive(Deserialize)]
struct Word {
    word: String,
    start: f64,
    end: f64,
    confidence: Option<f64>,
    speaker: Option<u32>,
}

#[derive(Deserialize)]
struct Utterance {
    start: f64,
    end: f64,
    transcript: String,
    speaker: Option<u32>,
}

#[derive(Deserialize)]
struct ErrorBody {
    err_msg: Option<String>,
    message: Option<String>,
}

#[async_trait]
impl TranscriptionEngine for DeepgramEngine {
    fn provider(&self) -> TranscriptionProvider {
        PROVIDER
    }

    async fn transcribe(
        &self,
        audio_data: &[u8],
        file_name: &str,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscriptionError::MissingCredential {
                provider: PROVIDER,
                variable: PROVIDER.credential_variable(),
            })?;

        let url = format!("{}/v1/listen", self.base_url);
        let diarize = options.diarization.to_string();

        tracing::debug!(
            model = %self.model,
            language = %options.language(),
            diarize = options.diarization,
            "Sending audio to Deepgram"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", api_key))
            .header(CONTENT_TYPE, audio_mime_type(file_name))
            .query(&[
                ("model", self.model.as_str()),
                ("language", options.language()),
                ("smart_format", "true"),
                ("diarize", diarize.as_str()),
                ("punctuate", "true"),
                ("utterances", "true"),
            ])
            .body(audio_data.to_vec())
            .send()
            .await
            .map_err(|e| TranscriptionError::provider_error(PROVIDER, format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::provider_error(
                PROVIDER,
                error_message(status, &body),
            ));
        }

        let listen: ListenResponse = response.json().await.map_err(|e| {
            TranscriptionError::provider_error(PROVIDER, format!("parse response: {}", e))
        })?;

        let result = into_transcription_result(listen)?;

        tracing::info!(
            chars = result.text.len(),
            segments = result.segments.as_ref().map_or(0, Vec::len),
            "Deepgram transcription completed"
        );

        Ok(result)
    }
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.err_msg.or(e.message))
        .unwrap_or_else(|| body.to_string());
    format!("status {}: {}", status, detail)
}

fn into_transcription_result(
    listen: ListenResponse,
) -> Result<TranscriptionResult, TranscriptionError> {
    let mut results = listen.results.ok_or_else(|| {
        TranscriptionError::provider_error(PROVIDER, "No transcription results from Deepgram")
    })?;

    let alternative = results
        .channels
        .drain(..)
        .next()
        .and_then(|channel| channel.alternatives.into_iter().next())
        .ok_or_else(|| {
            TranscriptionError::provider_error(PROVIDER, "No transcription results from Deepgram")
        })?;

    let words = alternative.words.map(|words| {
        words
            .into_iter()
            .map(|w| TranscriptWord {
                word: w.word,
                start: w.start,
                end: w.end,
                confidence: w.confidence,
                speaker: w.speaker.map(speaker_label),
            })
            .collect()
    });

    let segments = results.utterances.map(|utterances| {
        utterances
            .into_iter()
            .map(|u| TranscriptSegment {
                start: u.start,
                end: u.end,
                text: u.transcript,
                speaker: u.speaker.map(speaker_label),
            })
            .collect()
    });

    Ok(TranscriptionResult {
        text: alternative.transcript,
        segments,
        words,
    })
}
