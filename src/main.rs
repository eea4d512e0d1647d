use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use callcoach::domain::largest_max_file_size;
use callcoach::infrastructure::audio::TranscriptionEngineFactory;
use callcoach::infrastructure::llm::ChatCompletionClient;
use callcoach::infrastructure::observability::{TracingConfig, init_tracing};
use callcoach::infrastructure::storage::HttpAudioFetcher;
use callcoach::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&TracingConfig::from_settings(&settings.logging, environment))?;

    let engines = TranscriptionEngineFactory::create_all(&settings.transcription);
    let llm_client = Arc::new(ChatCompletionClient::new(&settings.llm));
    if settings.llm.api_key.is_none() {
        tracing::warn!("LLM credential missing, feedback generation will fail");
    }
    let audio_fetcher = Arc::new(HttpAudioFetcher::new(
        settings.storage.allowed_host_suffix.clone(),
        Duration::from_secs(settings.storage.fetch_timeout_secs),
        largest_max_file_size(),
    )?);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;

    let state = AppState::new(settings, engines, llm_client, audio_fetcher);
    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
