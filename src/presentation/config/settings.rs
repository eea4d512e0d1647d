use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use crate::domain::TranscriptionProvider;
use crate::infrastructure::audio::{
    DEFAULT_ASSEMBLYAI_BASE_URL, DEFAULT_DEEPGRAM_BASE_URL, DEFAULT_DEEPGRAM_MODEL,
    DEFAULT_POLL_INTERVAL,
};
use crate::infrastructure::llm::{DEFAULT_CHAT_MODEL, DEFAULT_LLM_BASE_URL};
use crate::infrastructure::storage::{DEFAULT_ALLOWED_HOST_SUFFIX, DEFAULT_FETCH_TIMEOUT};

use super::Environment;

const LLM_CREDENTIAL_VARIABLE: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub llm: LlmSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    pub attempt_timeout_secs: u64,
    pub deepgram: DeepgramSettings,
    pub assemblyai: AssemblyAiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepgramSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyAiSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub allowed_host_suffix: String,
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: 60,
            deepgram: DeepgramSettings {
                api_key: None,
                base_url: DEFAULT_DEEPGRAM_BASE_URL.to_string(),
                model: DEFAULT_DEEPGRAM_MODEL.to_string(),
            },
            assemblyai: AssemblyAiSettings {
                api_key: None,
                base_url: DEFAULT_ASSEMBLYAI_BASE_URL.to_string(),
                poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            },
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.3,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            allowed_host_suffix: DEFAULT_ALLOWED_HOST_SUFFIX.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}

impl Settings {
    /// Defaults, then `appsettings.{environment}.toml`, then `APP__SECTION__KEY` variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let configuration = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let mut settings: Settings = configuration.try_deserialize()?;
        settings.apply_credential_fallbacks(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Fills unset API keys from the conventional provider variables.
    pub fn apply_credential_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |current: &mut Option<String>, variable: &str| {
            if current.as_deref().is_none_or(|k| k.trim().is_empty()) {
                *current = lookup(variable).filter(|k| !k.trim().is_empty());
            }
        };

        resolve(
            &mut self.transcription.deepgram.api_key,
            TranscriptionProvider::Deepgram.credential_variable(),
        );
        resolve(
            &mut self.transcription.assemblyai.api_key,
            TranscriptionProvider::AssemblyAi.credential_variable(),
        );
        resolve(&mut self.llm.api_key, LLM_CREDENTIAL_VARIABLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unset_keys_when_applying_fallbacks_then_conventional_variables_are_used() {
        let mut settings = Settings::default();

        settings.apply_credential_fallbacks(|name| match name {
            "DEEPGRAM_API_KEY" => Some("dg-key".to_string()),
            "GROQ_API_KEY" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(
            settings.transcription.deepgram.api_key.as_deref(),
            Some("dg-key")
        );
        assert_eq!(settings.transcription.assemblyai.api_key, None);
        assert_eq!(settings.llm.api_key, None);
    }

    #[test]
    fn given_configured_key_when_applying_fallbacks_then_configured_key_wins() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("configured".to_string());

        settings.apply_credential_fallbacks(|_| Some("from-env".to_string()));

        assert_eq!(settings.llm.api_key.as_deref(), Some("configured"));
    }

    #[test]
    fn given_defaults_when_created_then_match_documented_values() {
        let settings = Settings::default();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.transcription.attempt_timeout_secs, 60);
        assert_eq!(settings.transcription.deepgram.model, "nova-3");
        assert_eq!(settings.transcription.assemblyai.poll_interval_ms, 3000);
        assert_eq!(settings.llm.chat_model, "llama-3.3-70b-versatile");
        assert_eq!(settings.storage.allowed_host_suffix, ".convex.cloud");
        assert_eq!(settings.storage.fetch_timeout_secs, 60);
    }
}
