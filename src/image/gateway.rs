// src/image/gateway.rs
// Image generation behind a fixed-order fallback chain ending in placeholders

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::artifact::ImageArtifact;
use super::circuit_breaker::CircuitBreaker;
use super::images_api::ImagesApiClient;
use super::placeholder::PlaceholderSynthesizer;
use super::provider::{ImageProvider, NO_IMAGE_MODEL, PLACEHOLDER_MODEL};
use super::replicate::ReplicateClient;
use crate::config::VizzyConfig;
use crate::error::{Result, VizzyError};

/// A complete batch with a single provenance
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    pub images: Vec<ImageArtifact>,
    pub model: String,
}

impl ImageBatch {
    /// The batch for a turn that generated no images
    pub fn none() -> Self {
        Self {
            images: Vec::new(),
            model: NO_IMAGE_MODEL.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.model == PLACEHOLDER_MODEL
    }
}

pub struct ImageGateway {
    providers: Vec<Arc<dyn ImageProvider>>,
    placeholder: PlaceholderSynthesizer,
    breaker: CircuitBreaker,
}

impl ImageGateway {
    /// Gateway trying `providers` in order before falling back to placeholders.
    /// Circuit state is kept per `provider_name`, which must be unique in the chain.
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>) -> Self {
        Self {
            providers,
            placeholder: PlaceholderSynthesizer::new(),
            breaker: CircuitBreaker::new(),
        }
    }

    pub fn with_breaker(mut self, breaker: CircuitBreaker) -> Self {
        self.breaker = breaker;
        self
    }

    /// Real providers for whichever keys are configured: Replicate, then the images API
    pub fn from_config(config: &VizzyConfig) -> Self {
        let mut providers: Vec<Arc<dyn ImageProvider>> = Vec::new();

        if let Some(token) = &config.keys.replicate {
            info!(model = %config.replicate_model, "Replicate image provider enabled");
            providers.push(Arc::new(ReplicateClient::new(
                token.clone(),
                config.replicate_url.clone(),
                config.replicate_model.clone(),
                config.image_timeout(),
            )));
        }

        if let Some(key) = config.keys.images_key() {
            info!(model = %config.image_model, url = %config.image_api_url, "Images API provider enabled");
            providers.push(Arc::new(ImagesApiClient::new(
                key.to_string(),
                config.image_api_url.clone(),
                config.image_model.clone(),
                config.image_timeout(),
            )));
        }

        if providers.is_empty() {
            warn!("No image provider configured, every image will be a placeholder");
        }
        Self::new(providers)
    }

    /// Reported model identities of the real providers, in the order they are tried
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.image_model()).collect()
    }

    /// Generate exactly `count` images. Never fails: each real provider gets one attempt
    /// at the whole batch, then the placeholder synthesizer fills in.
    #[instrument(skip(self, prompt), fields(providers = self.providers.len()))]
    pub async fn generate(&self, prompt: &str, count: usize) -> ImageBatch {
        if count == 0 {
            return ImageBatch::none();
        }

        for provider in &self.providers {
            let name = provider.provider_name();
            if !self.breaker.is_available(name) {
                info!(provider = name, "Circuit open, skipping provider");
                continue;
            }

            let attempt = provider
                .generate(prompt, count)
                .await
                .and_then(|images| validate_batch(images, count));

            match attempt {
                Ok(images) => {
                    self.breaker.record_success(name);
                    let model = provider.image_model();
                    info!(provider = name, model = %model, count, "Image batch generated");
                    return ImageBatch { images, model };
                }
                Err(e) => {
                    self.breaker.record_failure(name);
                    warn!(provider = name, error = %e, "Image provider failed, trying next");
                }
            }
        }

        info!(count, "Using placeholder images");
        ImageBatch {
            images: self.placeholder.generate(prompt, count),
            model: PLACEHOLDER_MODEL.to_string(),
        }
    }
}

/// A real provider's batch only counts if it is complete and entirely remote
fn validate_batch(images: Vec<ImageArtifact>, count: usize) -> Result<Vec<ImageArtifact>> {
    if images.len() != count {
        return Err(VizzyError::Upstream(format!(
            "partial batch: got {} of {} images",
            images.len(),
            count
        )));
    }
    if let Some(bad) = images.iter().find(|image| !image.is_remote()) {
        return Err(VizzyError::Upstream(format!(
            "provider returned a non-remote image: {:.40}",
            bad.as_str()
        )));
    }
    Ok(images)
}
