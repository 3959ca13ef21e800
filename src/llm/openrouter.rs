// src/llm/openrouter.rs
// OpenRouter chat completions client (OpenAI-compatible)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::prompt::system_prompt;
use super::provider::{Interpretation, LlmClient};
use crate::engine::Mode;
use crate::error::{Result, VizzyError};
use crate::http_client::UpstreamHttpClient;
use crate::session::{Message, Role};

const APP_TITLE: &str = "Vizzy Chat";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Chat completion request (OpenAI-compatible format)
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenRouterClient {
    api_key: String,
    url: String,
    model: String,
    http: UpstreamHttpClient,
}

impl OpenRouterClient {
    pub fn new(api_key: String, url: String, model: String, timeout: Duration) -> Self {
        Self {
            api_key,
            url,
            model,
            http: UpstreamHttpClient::new(timeout),
        }
    }

    fn build_request<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
        history: &'a [Message],
    ) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
        messages.extend(history.iter().map(|m| ChatMessage {
            role: match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: &m.content,
        }));
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.7,
        }
    }

    fn parse_response(body: &str) -> Result<String> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| VizzyError::Upstream(format!("malformed chat response: {}", e)))?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| VizzyError::Upstream("chat response has no content".into()))
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt, history), fields(model = %self.model, history = history.len()))]
    async fn interpret(
        &self,
        prompt: &str,
        history: &[Message],
        mode: Mode,
    ) -> Result<Interpretation> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let system = system_prompt(mode);
        let body = serde_json::to_string(&self.build_request(&system, prompt, history))?;
        debug!(request_id = %request_id, bytes = body.len(), "Sending chat completion");

        let response = self
            .http
            .execute_with_retry(&request_id, body, |client, body| {
                client
                    .post(&self.url)
                    .bearer_auth(&self.api_key)
                    .header("Content-Type", "application/json")
                    .header("X-Title", APP_TITLE)
                    .body(body)
            })
            .await?;

        let reply = Self::parse_response(&response)?;
        let interpretation = Interpretation::from_reply(&reply)?;
        info!(
            request_id = %request_id,
            intent = %interpretation.intent_category,
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat completion finished"
        );
        Ok(interpretation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenRouterClient {
        OpenRouterClient::new(
            "sk-or-test".into(),
            "https://openrouter.ai/api/v1/chat/completions".into(),
            "openrouter/auto".into(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_request_includes_history_in_order() {
        let client = client();
        let history = vec![
            Message::user("Create a beautiful sunset"),
            Message::assistant("Here is a golden sunset."),
        ];
        let system = system_prompt(Mode::Chat);
        let request = serde_json::to_value(client.build_request(&system, "What about a storm?", &history))
            .unwrap();

        assert_eq!(request["model"], "openrouter/auto");
        assert_eq!(request["response_format"]["type"], "json_object");
        let messages = request["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Create a beautiful sunset");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[3]["content"], "What about a storm?");
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"id":"gen-1","choices":[{"message":{"role":"assistant","content":"{\"intent_category\":\"landscape\",\"copy\":\"Dusk.\"}"}}]}"#;
        let reply = OpenRouterClient::parse_response(body).unwrap();
        assert!(reply.contains("landscape"));
    }

    #[test]
    fn test_parse_response_without_content() {
        assert!(OpenRouterClient::parse_response(r#"{"choices":[]}"#).is_err());
        assert!(
            OpenRouterClient::parse_response(r#"{"choices":[{"message":{"content":null}}]}"#)
                .is_err()
        );
        assert!(OpenRouterClient::parse_response("gateway timeout").is_err());
    }
}
