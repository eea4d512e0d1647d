use super::TranscriptionProvider;

const MEGABYTE: u64 = 1024 * 1024;

const COMMON_AUDIO_FORMATS: &[&str] = &["mp3", "mp4", "wav", "flac", "ogg", "webm", "m4a"];

/// Static capabilities of a transcription provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderConfig {
    pub max_file_size: u64,
    pub supported_formats: &'static [&'static str],
    pub supports_diarization: bool,
}

impl ProviderConfig {
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size / MEGABYTE
    }

    /// `extension` must already be lower-cased and carry no leading dot.
    pub fn supports_format(&self, extension: &str) -> bool {
        self.supported_formats.contains(&extension)
    }
}

pub fn config_for(provider: TranscriptionProvider) -> ProviderConfig {
    match provider {
        TranscriptionProvider::Deepgram => ProviderConfig {
            max_file_size: 50 * MEGABYTE,
            supported_formats: COMMON_AUDIO_FORMATS,
            supports_diarization: true,
        },
        TranscriptionProvider::AssemblyAi => ProviderConfig {
            max_file_size: 50 * MEGABYTE,
            supported_formats: COMMON_AUDIO_FORMATS,
            supports_diarization: true,
        },
    }
}

/// Largest upload any provider accepts; downloads beyond it are useless.
pub fn largest_max_file_size() -> u64 {
    TranscriptionProvider::ALL
        .into_iter()
        .map(|provider| config_for(provider).max_file_size)
        .max()
        .unwrap_or(0)
}
