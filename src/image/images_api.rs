// src/image/images_api.rs
// OpenAI-compatible `/images/generations` client (OpenRouter by default)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::artifact::ImageArtifact;
use super::provider::ImageProvider;
use crate::error::{Result, VizzyError};
use crate::http_client::UpstreamHttpClient;

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: usize,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    url: Option<String>,
}

pub struct ImagesApiClient {
    api_key: String,
    url: String,
    model: String,
    http: UpstreamHttpClient,
}

impl ImagesApiClient {
    pub fn new(api_key: String, url: String, model: String, timeout: Duration) -> Self {
        Self {
            api_key,
            url,
            model,
            http: UpstreamHttpClient::single_attempt(timeout),
        }
    }

    fn parse_response(body: &str) -> Result<Vec<ImageArtifact>> {
        let response: GenerationResponse = serde_json::from_str(body)
            .map_err(|e| VizzyError::Upstream(format!("malformed images response: {}", e)))?;
        if response.data.is_empty() {
            return Err(VizzyError::Upstream("images API returned no data".into()));
        }
        response
            .data
            .into_iter()
            .map(|image| match image.url {
                Some(url) => ImageArtifact::remote(&url),
                None => Err(VizzyError::Upstream("image entry without url".into())),
            })
            .collect()
    }
}

#[async_trait]
impl ImageProvider for ImagesApiClient {
    fn provider_name(&self) -> &str {
        "images_api"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<ImageArtifact>> {
        let request_id = Uuid::new_v4().to_string();
        let body = serde_json::to_string(&GenerationRequest {
            model: &self.model,
            prompt,
            n: count,
            response_format: "url",
        })?;

        let response = self
            .http
            .post_json(&request_id, &self.url, &self.api_key, body)
            .await?;

        let images = Self::parse_response(&response)?;
        debug!(request_id = %request_id, images = images.len(), "Images API call succeeded");
        Ok(images)
    }
}
