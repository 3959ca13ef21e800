// src/llm/provider.rs
// LLM client abstraction and reply interpretation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::Mode;
use crate::error::{Result, VizzyError};
use crate::session::Message;

/// Intent reported when the model gives none
pub const DEFAULT_INTENT: &str = "general";

/// What the model made of a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub intent_category: String,
    pub copy: String,
}

impl Interpretation {
    pub fn new(intent_category: impl Into<String>, copy: impl Into<String>) -> Self {
        Self {
            intent_category: intent_category.into(),
            copy: copy.into(),
        }
    }

    /// Parse a model reply. The model is asked for `{"intent_category", "copy"}` but
    /// anything that is not that object is kept verbatim as copy.
    pub fn from_reply(reply: &str) -> Result<Self> {
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(VizzyError::Upstream("model returned an empty reply".into()));
        }

        #[derive(Deserialize)]
        struct Structured {
            #[serde(default)]
            intent_category: Option<String>,
            #[serde(default)]
            copy: Option<String>,
        }

        let parsed = serde_json::from_str::<Structured>(strip_code_fence(reply)).ok();
        let (intent, copy) = match parsed {
            Some(Structured { intent_category, copy }) => (intent_category, copy),
            None => (None, None),
        };

        let intent = intent
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| DEFAULT_INTENT.to_string());
        let copy = copy
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| reply.to_string());

        Ok(Self::new(intent, copy))
    }
}

/// Models sometimes wrap JSON in a markdown fence despite json mode
fn strip_code_fence(reply: &str) -> &str {
    let Some(inner) = reply.strip_prefix("```") else {
        return reply;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Language model used for every turn
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier reported as `llm_model`
    fn model_name(&self) -> &str;

    /// One remote call: classify the prompt and write the reply copy
    async fn interpret(&self, prompt: &str, history: &[Message], mode: Mode)
    -> Result<Interpretation>;
}
