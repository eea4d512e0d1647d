use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use callcoach::application::ports::{
    TranscriptionEngine, TranscriptionError, TranscriptionOptions,
};
use callcoach::domain::TranscriptionProvider;
use callcoach::infrastructure::audio::DeepgramEngine;

const LISTEN_RESPONSE: &str = r#"{
    "results": {
        "channels": [{
            "alternatives": [{
                "transcript": "hello there",
                "words": [
                    {"word": "hello", "start": 0.1, "end": 0.4, "confidence": 0.98, "speaker": 0},
                    {"word": "there", "start": 0.5, "end": 0.9, "confidence": 0.95, "speaker": 1}
                ]
            }]
        }],
        "utterances": [
            {"start": 0.1, "end": 0.4, "transcript": "hello", "speaker": 0},
            {"start": 0.5, "end": 0.9, "transcript": "there", "speaker": 1}
        ]
    }
}"#;

#[derive(Default)]
struct Captured {
    query: HashMap<String, String>,
    authorization: Option<String>,
    content_type: Option<String>,
}

async fn start_mock_deepgram_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, Arc<Mutex<Captured>>, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let captured = Arc::new(Mutex::new(Captured::default()));
    let sink = Arc::clone(&captured);

    let app = Router::new().route(
        "/v1/listen",
        post(
            move |Query(query): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                let header = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .map(String::from)
                };
                *sink.lock().unwrap() = Captured {
                    query,
                    authorization: header("authorization"),
                    content_type: header("content-type"),
                };
                let status = StatusCode::from_u16(response_status).unwrap();
                (status, response_body).into_response()
            },
        ),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, captured, shutdown_tx)
}

fn diarized() -> TranscriptionOptions {
    TranscriptionOptions {
        language: None,
        diarization: true,
    }
}

#[tokio::test]
async fn given_diarized_response_when_transcribing_then_result_is_normalized() {
    let (base_url, _captured, shutdown_tx) = start_mock_deepgram_server(200, LISTEN_RESPONSE).await;
    let engine = DeepgramEngine::new(Some("dg-key".to_string()), Some(base_url), None);

    let result = engine
        .transcribe(b"fake audio", "call.mp3", &diarized())
        .await
        .unwrap();

    assert_eq!(result.text, "hello there");
    let segments = result.segments.unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].speaker.as_deref(), Some("Speaker 0"));
    assert_eq!(segments[1].speaker.as_deref(), Some("Speaker 1"));
    assert_eq!(segments[1].text, "there");
    let words = result.words.unwrap();
    assert_eq!(words[0].word, "hello");
    assert_eq!(words[0].confidence, Some(0.98));
    assert_eq!(words[1].speaker.as_deref(), Some("Speaker 1"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_options_when_transcribing_then_request_carries_model_language_and_auth() {
    let (base_url, captured, shutdown_tx) = start_mock_deepgram_server(200, LISTEN_RESPONSE).await;
    let engine = DeepgramEngine::new(Some("dg-key".to_string()), Some(base_url), None);

    engine
        .transcribe(b"fake audio", "call.wav", &diarized())
        .await
        .unwrap();

    let captured = captured.lock().unwrap();
    assert_eq!(captured.query.get("model").map(String::as_str), Some("nova-3"));
    assert_eq!(captured.query.get("language").map(String::as_str), Some("en"));
    assert_eq!(captured.query.get("diarize").map(String::as_str), Some("true"));
    assert_eq!(captured.query.get("utterances").map(String::as_str), Some("true"));
    assert_eq!(captured.authorization.as_deref(), Some("Token dg-key"));
    assert_eq!(captured.content_type.as_deref(), Some("audio/wav"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_response_without_utterances_when_transcribing_then_segments_are_absent() {
    let body = r#"{"results": {"channels": [{"alternatives": [{"transcript": "just text"}]}]}}"#;
    let (base_url, _captured, shutdown_tx) = start_mock_deepgram_server(200, body).await;
    let engine = DeepgramEngine::new(Some("dg-key".to_string()), Some(base_url), None);

    let result = engine
        .transcribe(b"fake audio", "call.mp3", &TranscriptionOptions::default())
        .await
        .unwrap();

    assert_eq!(result.text, "just text");
    assert!(result.segments.is_none());
    assert!(result.words.is_none());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_error_status_when_transcribing_then_provider_error_with_message() {
    let body = r#"{"err_code": "INVALID_AUTH", "err_msg": "Invalid credentials."}"#;
    let (base_url, _captured, shutdown_tx) = start_mock_deepgram_server(401, body).await;
    let engine = DeepgramEngine::new(Some("bad-key".to_string()), Some(base_url), None);

    let err = engine
        .transcribe(b"fake audio", "call.mp3", &diarized())
        .await
        .expect_err("401 must fail");

    assert!(matches!(
        err,
        TranscriptionError::ProviderError {
            provider: TranscriptionProvider::Deepgram,
            ..
        }
    ));
    assert!(err.to_string().contains("Invalid credentials."));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_empty_channels_when_transcribing_then_no_results_error() {
    let body = r#"{"results": {"channels": []}}"#;
    let (base_url, _captured, shutdown_tx) = start_mock_deepgram_server(200, body).await;
    let engine = DeepgramEngine::new(Some("dg-key".to_string()), Some(base_url), None);

    let err = engine
        .transcribe(b"fake audio", "call.mp3", &diarized())
        .await
        .expect_err("no alternatives");

    assert!(err.to_string().contains("No transcription results from Deepgram"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_no_api_key_when_transcribing_then_missing_credential_without_request() {
    let engine = DeepgramEngine::new(None, Some("http://127.0.0.1:9".to_string()), None);

    let err = engine
        .transcribe(b"fake audio", "call.mp3", &diarized())
        .await
        .expect_err("no key configured");

    assert!(matches!(
        err,
        TranscriptionError::MissingCredential {
            variable: "DEEPGRAM_API_KEY",
            ..
        }
    ));
}
