use std::time::Duration;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use callcoach::application::ports::{AudioFetchError, AudioFetcher};
use callcoach::infrastructure::storage::HttpAudioFetcher;

const LOCAL_HOST: &str = "127.0.0.1";
const AUDIO: &[u8] = b"RIFF0000WAVEfmt ";

async fn start_mock_storage_server() -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);
    let redirect_target = format!("http://localhost:{}/audio/ok", addr.port());

    let app = Router::new()
        .route("/audio/ok", get(|| async { AUDIO }))
        .route("/audio/large", get(|| async { vec![0u8; 64] }))
        .route(
            "/audio/redirect",
            get(move || async move {
                (StatusCode::FOUND, [(header::LOCATION, redirect_target)]).into_response()
            }),
        )
        .route(
            "/audio/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                AUDIO
            }),
        )
        .route(
            "/audio/missing",
            get(|| async { StatusCode::NOT_FOUND }),
        );

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn fetcher(timeout: Duration, max_bytes: u64) -> HttpAudioFetcher {
    HttpAudioFetcher::new(LOCAL_HOST, timeout, max_bytes).unwrap()
}

#[tokio::test]
async fn given_allowed_host_when_fetching_then_returns_body() {
    let (base_url, shutdown_tx) = start_mock_storage_server().await;

    let bytes = fetcher(Duration::from_secs(5), 1024)
        .fetch(&format!("{}/audio/ok", base_url))
        .await
        .unwrap();

    assert_eq!(bytes, AUDIO);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_redirect_to_other_host_when_fetching_then_redirect_is_not_followed() {
    let (base_url, shutdown_tx) = start_mock_storage_server().await;

    let result = fetcher(Duration::from_secs(5), 1024)
        .fetch(&format!("{}/audio/redirect", base_url))
        .await;

    assert!(matches!(result, Err(AudioFetchError::RequestFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_body_larger_than_limit_when_fetching_then_too_large() {
    let (base_url, shutdown_tx) = start_mock_storage_server().await;

    let result = fetcher(Duration::from_secs(5), 16)
        .fetch(&format!("{}/audio/large", base_url))
        .await;

    assert!(matches!(result, Err(AudioFetchError::TooLarge { .. })));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_slow_storage_when_fetching_then_request_fails_within_timeout() {
    let (base_url, shutdown_tx) = start_mock_storage_server().await;

    let result = tokio::time::timeout(
        Duration::from_secs(1),
        fetcher(Duration::from_millis(100), 1024).fetch(&format!("{}/audio/slow", base_url)),
    )
    .await
    .expect("client timeout fires first");

    assert!(matches!(result, Err(AudioFetchError::RequestFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_object_when_fetching_then_request_fails() {
    let (base_url, shutdown_tx) = start_mock_storage_server().await;

    let result = fetcher(Duration::from_secs(5), 1024)
        .fetch(&format!("{}/audio/missing", base_url))
        .await;

    assert!(matches!(result, Err(AudioFetchError::RequestFailed(_))));
    shutdown_tx.send(()).ok();
}
