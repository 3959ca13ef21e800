// src/config/env.rs
// API keys read from the environment

use tracing::{debug, warn};

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// OpenRouter API key (OPENROUTER_API_KEY), used for chat and the images API
    pub openrouter: Option<String>,
    /// Replicate API token (REPLICATE_API_TOKEN)
    pub replicate: Option<String>,
    /// Dedicated key for the images API (VIZZY_IMAGE_API_KEY), overrides OpenRouter's
    pub image_api: Option<String>,
}

impl ApiKeys {
    /// Load API keys through an arbitrary lookup, filtering empty values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|k| !k.trim().is_empty());

        let keys = Self {
            openrouter: read("OPENROUTER_API_KEY"),
            replicate: read("REPLICATE_API_TOKEN"),
            image_api: read("VIZZY_IMAGE_API_KEY"),
        };
        keys.log_status();
        keys
    }

    /// Key for the OpenAI-compatible images endpoint
    pub fn images_key(&self) -> Option<&str> {
        self.image_api.as_deref().or(self.openrouter.as_deref())
    }

    /// Log which keys are available (without exposing values)
    fn log_status(&self) {
        let mut available = Vec::new();
        if self.openrouter.is_some() {
            available.push("OpenRouter");
        }
        if self.replicate.is_some() {
            available.push("Replicate");
        }
        if self.image_api.is_some() {
            available.push("Images API");
        }

        if available.is_empty() {
            warn!("No API keys configured - chat is unavailable and images fall back to placeholders");
        } else {
            debug!(keys = ?available, "API keys loaded");
        }
    }
}
