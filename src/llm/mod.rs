// src/llm/mod.rs
// Language model gateway: intent classification and copywriting

mod openrouter;
mod prompt;
mod provider;

pub use openrouter::OpenRouterClient;
pub use prompt::system_prompt;
pub use provider::{DEFAULT_INTENT, Interpretation, LlmClient};
