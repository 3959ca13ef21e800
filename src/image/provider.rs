// src/image/provider.rs
// Image provider abstraction

use async_trait::async_trait;

use super::artifact::ImageArtifact;
use crate::error::Result;

/// `image_model` reported when no image generation occurred
pub const NO_IMAGE_MODEL: &str = "none";

/// `image_model` reported when images came from the placeholder synthesizer
pub const PLACEHOLDER_MODEL: &str = "placeholder/svg";

/// A source of generated images. Implementations make a single attempt per call.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Service identity, unique within a gateway chain (e.g. `replicate`)
    fn provider_name(&self) -> &str;

    /// Model requested from the service
    fn model_name(&self) -> &str;

    /// Reported as `image_model` when this provider produced a batch. Two services
    /// may host the same model, so the service is part of it.
    fn image_model(&self) -> String {
        format!("{}:{}", self.provider_name(), self.model_name())
    }

    /// Generate `count` images for `prompt`
    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<ImageArtifact>>;
}
