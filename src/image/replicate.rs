// src/image/replicate.rs
// Replicate predictions API client (synchronous mode via `Prefer: wait`)

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
struct PredictionRequest<'a> {
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    num_outputs: usize,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    id: Option<String>,
    status: String,
    #[serde(default)]
    output: Option<PredictionOutput>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Most image models return a list of URLs; some return a single URL
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionOutput {
    Many(Vec<String>),
    One(String),
}

impl PredictionOutput {
    fn into_urls(self) -> Vec<String> {
        match self {
            Self::Many(urls) => urls,
            Self::One(url) => vec![url],
        }
    }
}

/// Replicate-hosted image model
pub struct ReplicateClient {
    api_token: String,
    base_url: String,
    model: String,
    http: UpstreamHttpClient,
}

impl ReplicateClient {
    pub fn new(api_token: String, base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            http: UpstreamHttpClient::single_attempt(timeout),
        }
    }

    fn predictions_url(&self) -> String {
        format!("{}/models/{}/predictions", self.base_url, self.model)
    }

    fn parse_prediction(body: &str) -> Result<Vec<ImageArtifact>> {
        let prediction: Prediction = serde_json::from_str(body)
            .map_err(|e| VizzyError::Upstream(format!("malformed Replicate response: {}", e)))?;

        if prediction.status != "succeeded" {
            return Err(VizzyError::Upstream(format!(
                "Replicate prediction {} ended as '{}': {}",
                prediction.id.as_deref().unwrap_or("?"),
                prediction.status,
                prediction.error.map(|e| e.to_string()).unwrap_or_default()
            )));
        }

        let urls = prediction.output.map(PredictionOutput::into_urls).unwrap_or_default();
        if urls.is_empty() {
            return Err(VizzyError::Upstream("Replicate returned no output".into()));
        }
        urls.iter().map(|url| ImageArtifact::remote(url)).collect()
    }
}

#[async_trait]
impl ImageProvider for ReplicateClient {
    fn provider_name(&self) -> &str {
        "replicate"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<ImageArtifact>> {
        let request_id = Uuid::new_v4().to_string();
        let body = serde_json::to_string(&PredictionRequest {
            input: PredictionInput {
                prompt,
                num_outputs: count,
            },
        })?;

        let url = self.predictions_url();
        let response = self
            .http
            .execute_with_retry(&request_id, body, |client, body| {
                client
                    .post(&url)
                    .bearer_auth(&self.api_token)
                    .header("Content-Type", "application/json")
                    .header("Prefer", "wait")
                    .body(body)
            })
            .await?;

        let images = Self::parse_prediction(&response)?;
        debug!(request_id = %request_id, images = images.len(), "Replicate prediction succeeded");
        Ok(images)
    }
}
