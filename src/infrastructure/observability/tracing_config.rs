use crate::presentation::config::{Environment, LoggingSettings};

/// Subscriber settings resolved from configuration and the `LOG_FORMAT` override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub environment: Environment,
    pub level: String,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn from_settings(logging: &LoggingSettings, environment: Environment) -> Self {
        let log_format = std::env::var("LOG_FORMAT").ok();
        Self::resolve(logging, environment, log_format.as_deref())
    }

    /// Production always logs JSON; elsewhere `LOG_FORMAT` or `logging.enable_json` opts in.
    pub fn resolve(
        logging: &LoggingSettings,
        environment: Environment,
        log_format: Option<&str>,
    ) -> Self {
        let json_requested = log_format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"));

        Self {
            environment,
            level: logging.level.trim().to_lowercase(),
            json_format: environment == Environment::Prod || logging.enable_json || json_requested,
        }
    }

    /// Filter used when `RUST_LOG` is unset. Crate events are never quieter than `debug`
    /// outside production.
    pub fn filter_directives(&self) -> String {
        match self.environment {
            Environment::Prod => format!("{},tower_http=info", self.level),
            Environment::Local | Environment::Test => {
                format!("{},callcoach=debug,tower_http=debug", self.level)
            }
        }
    }
}
