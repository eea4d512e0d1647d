mod http_audio_fetcher;
mod mock_audio_fetcher;

pub use http_audio_fetcher::{
    DEFAULT_ALLOWED_HOST_SUFFIX, DEFAULT_FETCH_TIMEOUT, HttpAudioFetcher, validate_storage_url,
};
pub use mock_audio_fetcher::MockAudioFetcher;
