// src/image/mod.rs
// Image generation: real providers, placeholder synthesis and the fallback gateway

mod artifact;
mod circuit_breaker;
mod gateway;
mod images_api;
mod placeholder;
mod provider;
mod replicate;

pub use artifact::{ImageArtifact, SVG_DATA_PREFIX};
pub use circuit_breaker::CircuitBreaker;
pub use gateway::{ImageBatch, ImageGateway};
pub use images_api::ImagesApiClient;
pub use placeholder::{Hsl, PlaceholderSynthesizer};
pub use provider::{ImageProvider, NO_IMAGE_MODEL, PLACEHOLDER_MODEL};
pub use replicate::ReplicateClient;
