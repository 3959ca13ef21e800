// src/config/mod.rs
// Runtime configuration loaded from .env and the process environment

mod env;

pub use env::ApiKeys;

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::error::{Result, VizzyError};
use crate::image::{NO_IMAGE_MODEL, PLACEHOLDER_MODEL};

pub const DEFAULT_LLM_MODEL: &str = "openrouter/auto";
pub const DEFAULT_LLM_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_IMAGE_API_URL: &str = "https://openrouter.ai/api/v1/images/generations";
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/flux-schnell";
pub const DEFAULT_REPLICATE_URL: &str = "https://api.replicate.com/v1";
pub const DEFAULT_REPLICATE_MODEL: &str = "black-forest-labs/flux-schnell";

#[derive(Debug, Clone)]
pub struct VizzyConfig {
    // ── Language model
    pub llm_model: String,
    pub llm_url: String,
    pub llm_timeout: u64,

    // ── Image generation
    pub image_api_url: String,
    pub image_model: String,
    pub replicate_url: String,
    pub replicate_model: String,
    pub image_timeout: u64,
    pub max_images: u32,

    // ── Sessions
    pub history_limit: usize,

    pub keys: ApiKeys,
}

impl Default for VizzyConfig {
    fn default() -> Self {
        Self {
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_url: DEFAULT_LLM_URL.to_string(),
            llm_timeout: 60,
            image_api_url: DEFAULT_IMAGE_API_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            replicate_url: DEFAULT_REPLICATE_URL.to_string(),
            replicate_model: DEFAULT_REPLICATE_MODEL.to_string(),
            image_timeout: 90,
            max_images: 8,
            history_limit: 12,
            keys: ApiKeys::default(),
        }
    }
}

/// Parse a variable, stripping inline comments; unparsable values fall back to the default
fn env_var_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    warn!(key = key, value = %val, "Config parse failed, using default");
                    default
                }
            }
        }
        None => default,
    }
}

impl VizzyConfig {
    /// Load configuration from the process environment. Call `dotenvy::dotenv()` first
    /// so `.env` values are visible here and to the command line parser alike.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let config = Self {
            llm_model: env_var_or(&lookup, "VIZZY_LLM_MODEL", d.llm_model),
            llm_url: env_var_or(&lookup, "VIZZY_LLM_URL", d.llm_url),
            llm_timeout: env_var_or(&lookup, "VIZZY_LLM_TIMEOUT", d.llm_timeout),
            image_api_url: env_var_or(&lookup, "VIZZY_IMAGE_API_URL", d.image_api_url),
            image_model: env_var_or(&lookup, "VIZZY_IMAGE_MODEL", d.image_model),
            replicate_url: env_var_or(&lookup, "VIZZY_REPLICATE_URL", d.replicate_url),
            replicate_model: env_var_or(&lookup, "VIZZY_REPLICATE_MODEL", d.replicate_model),
            image_timeout: env_var_or(&lookup, "VIZZY_IMAGE_TIMEOUT", d.image_timeout),
            max_images: env_var_or(&lookup, "VIZZY_MAX_IMAGES", d.max_images),
            history_limit: env_var_or(&lookup, "VIZZY_HISTORY_LIMIT", d.history_limit),
            keys: ApiKeys::from_lookup(&lookup),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would break the response contract
    pub fn validate(&self) -> Result<()> {
        for model in [&self.image_model, &self.replicate_model] {
            if model == NO_IMAGE_MODEL || model == PLACEHOLDER_MODEL {
                return Err(VizzyError::Config(format!(
                    "image model name '{}' is reserved",
                    model
                )));
            }
        }
        if self.llm_model.trim().is_empty() {
            return Err(VizzyError::Config("VIZZY_LLM_MODEL must not be empty".into()));
        }
        if self.max_images == 0 {
            return Err(VizzyError::Config("VIZZY_MAX_IMAGES must be at least 1".into()));
        }
        Ok(())
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout)
    }
}
