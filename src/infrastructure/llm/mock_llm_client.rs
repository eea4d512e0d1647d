use std::sync::Mutex;

use crate::application::ports::{LlmClient, LlmClientError};

/// Returns a canned completion and remembers the prompts it was given.
pub struct MockLlmClient {
    response: String,
    last_system_prompt: Mutex<Option<String>>,
}

impl MockLlmClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            last_system_prompt: Mutex::new(None),
        }
    }

    pub fn last_system_prompt(&self) -> Option<String> {
        self.last_system_prompt
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        _user_message: &str,
    ) -> Result<String, LlmClientError> {
        if let Ok(mut last) = self.last_system_prompt.lock() {
            *last = Some(system_prompt.to_string());
        }
        Ok(self.response.clone())
    }
}
