use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::application::ports::{TranscriptionEngine, TranscriptionError, TranscriptionOptions};
use crate::domain::{
    TranscriptSegment, TranscriptWord, TranscriptionProvider, TranscriptionResult, speaker_label,
};

const PROVIDER: TranscriptionProvider = TranscriptionProvider::AssemblyAi;
pub const DEFAULT_ASSEMBLYAI_BASE_URL: &str = "https://api.assemblyai.com";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_MAX_POLL_DURATION: Duration = Duration::from_secs(60);

/// Upload, submit, then poll AssemblyAI until the transcript settles.
pub struct AssemblyAiEngine {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    poll_interval: Duration,
    max_poll_duration: Duration,
}

impl AssemblyAiEngine {
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        poll_interval: Option<Duration>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_ASSEMBLYAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            poll_interval: poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            max_poll_duration: DEFAULT_MAX_POLL_DURATION,
        }
    }

    /// Upper bound on how long a submitted transcript may stay queued or processing.
    pub fn with_max_poll_duration(mut self, max_poll_duration: Duration) -> Self {
        self.max_poll_duration = max_poll_duration;
        self
    }

    async fn upload(&self, api_key: &str, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        let response = self
            .client
            .post(format!("{}/v2/upload", self.base_url))
            .header("authorization", api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(audio_data.to_vec())
            .send()
            .await
            .map_err(|e| TranscriptionError::provider_error(PROVIDER, format!("upload: {}", e)))?;

        let upload: UploadResponse = read_json(response, "upload").await?;
        Ok(upload.upload_url)
    }

    async fn submit(
        &self,
        api_key: &str,
        request: &TranscriptRequest<'_>,
    ) -> Result<Transcript, TranscriptionError> {
        let response = self
            .client
            .post(format!("{}/v2/transcript", self.base_url))
            .header("authorization", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TranscriptionError::provider_error(PROVIDER, format!("submit: {}", e)))?;

        read_json(response, "submit").await
    }

    async fn fetch(&self, api_key: &str, id: &str) -> Result<Transcript, TranscriptionError> {
        let response = self
            .client
            .get(format!("{}/v2/transcript/{}", self.base_url, id))
            .header("authorization", api_key)
            .send()
            .await
            .map_err(|e| TranscriptionError::provider_error(PROVIDER, format!("poll: {}", e)))?;

        read_json(response, "poll").await
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    language_code: &'a str,
    speaker_labels: bool,
}

#[derive(Deserialize)]
struct Transcript {
    id: String,
    status: TranscriptStatus,
    text: Option<String>,
    error: Option<String>,
    words: Option<Vec<Word>>,
    utterances: Option<Vec<Utterance>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

/// Times are in milliseconds.
#[derive(Deserialize)]
struct Word {
    text: String,
    start: f64,
    end: f64,
    confidence: Option<f64>,
    speaker: Option<String>,
}

#[derive(Deserialize)]
struct Utterance {
    text: String,
    start: f64,
    end: f64,
    speaker: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[async_trait]
impl TranscriptionEngine for AssemblyAiEngine {
    fn provider(&self) -> TranscriptionProvider {
        PROVIDER
    }

    async fn transcribe(
        &self,
        audio_data: &[u8],
        _file_name: &str,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscriptionError::MissingCredential {
                provider: PROVIDER,
                variable: PROVIDER.credential_variable(),
            })?;

        tracing::debug!(bytes = audio_data.len(), "Uploading audio to AssemblyAI");
        let upload_url = self.upload(api_key, audio_data).await?;

        let request = TranscriptRequest {
            audio_url: &upload_url,
            language_code: options.language(),
            speaker_labels: options.diarization,
        };
        let mut transcript = self.submit(api_key, &request).await?;

        tracing::debug!(transcript_id = %transcript.id, "AssemblyAI transcript submitted");

        let deadline = tokio::time::Instant::now() + self.max_poll_duration;
        while matches!(
            transcript.status,
            TranscriptStatus::Queued | TranscriptStatus::Processing
        ) {
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(
                    transcript_id = %transcript.id,
                    status = ?transcript.status,
                    "AssemblyAI transcript did not settle in time"
                );
                return Err(TranscriptionError::Timeout {
                    provider: PROVIDER,
                    seconds: self.max_poll_duration.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
            transcript = self.fetch(api_key, &transcript.id).await?;
        }

        if transcript.status == TranscriptStatus::Error {
            return Err(TranscriptionError::provider_error(
                PROVIDER,
                transcript
                    .error
                    .unwrap_or_else(|| "transcription failed".to_string()),
            ));
        }

        let result = into_transcription_result(transcript);

        tracing::info!(
            chars = result.text.len(),
            segments = result.segments.as_ref().map_or(0, Vec::len),
            "AssemblyAI transcription completed"
        );

        Ok(result)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    stage: &str,
) -> Result<T, TranscriptionError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or(body);
        return Err(TranscriptionError::provider_error(
            PROVIDER,
            format!("{} status {}: {}", stage, status, detail),
        ));
    }

    response.json().await.map_err(|e| {
        TranscriptionError::provider_error(PROVIDER, format!("{} parse response: {}", stage, e))
    })
}

fn ms_to_seconds(ms: f64) -> f64 {
    ms / 1000.0
}

fn speaker(label: Option<String>) -> Option<String> {
    label.filter(|l| !l.is_empty()).map(speaker_label)
}

fn into_transcription_result(transcript: Transcript) -> TranscriptionResult {
    let words = transcript.words.map(|words| {
        words
            .into_iter()
            .map(|w| TranscriptWord {
                word: w.text,
                start: ms_to_seconds(w.start),
                end: ms_to_seconds(w.end),
                confidence: w.confidence,
                speaker: speaker(w.speaker),
            })
            .collect()
    });

    let segments = transcript.utterances.map(|utterances| {
        utterances
            .into_iter()
            .map(|u| TranscriptSegment {
                start: ms_to_seconds(u.start),
                end: ms_to_seconds(u.end),
                text: u.text,
                speaker: speaker(u.speaker),
            })
            .collect()
    });

    TranscriptionResult {
        text: transcript.text.unwrap_or_default(),
        segments,
        words,
    }
}
