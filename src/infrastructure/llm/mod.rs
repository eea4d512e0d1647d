mod chat_completion_client;
mod mock_llm_client;

pub use chat_completion_client::{ChatCompletionClient, DEFAULT_CHAT_MODEL, DEFAULT_LLM_BASE_URL};
pub use mock_llm_client::MockLlmClient;
