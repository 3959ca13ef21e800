// tests/test_helpers.rs
// Shared stubs and request helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

use vizzy::engine::{Engine, EngineLimits, Mode};
use vizzy::image::{ImageArtifact, ImageGateway, ImageProvider};
use vizzy::llm::{Interpretation, LlmClient};
use vizzy::session::Message;
use vizzy::web::{AppState, create_router};
use vizzy::{Result, VizzyError};

pub const LLM_MODEL: &str = "openrouter/auto";

/// Deterministic language model: echoes the prompt, tags the intent by mode
pub struct ScriptedLlm;

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn model_name(&self) -> &str {
        LLM_MODEL
    }

    async fn interpret(
        &self,
        prompt: &str,
        _history: &[Message],
        mode: Mode,
    ) -> Result<Interpretation> {
        let intent = match mode {
            Mode::Chat => "question",
            Mode::Image { .. } => "artwork",
        };
        Ok(Interpretation::new(intent, format!("Copy for: {}", prompt)))
    }
}

/// Language model that always fails with the given kind of error
pub struct FailingLlm {
    pub timeout: bool,
}

#[async_trait]
impl LlmClient for FailingLlm {
    fn model_name(&self) -> &str {
        LLM_MODEL
    }

    async fn interpret(
        &self,
        _prompt: &str,
        _history: &[Message],
        _mode: Mode,
    ) -> Result<Interpretation> {
        if self.timeout {
            Err(VizzyError::UpstreamTimeout("operation timed out".into()))
        } else {
            Err(VizzyError::Upstream("API error 503 Service Unavailable".into()))
        }
    }
}

/// Image provider that is always down
pub struct DownProvider {
    pub calls: AtomicUsize,
}

impl DownProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for DownProvider {
    fn provider_name(&self) -> &str {
        "replicate"
    }

    fn model_name(&self) -> &str {
        "black-forest-labs/flux-schnell"
    }

    async fn generate(&self, _prompt: &str, _count: usize) -> Result<Vec<ImageArtifact>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(VizzyError::Upstream("API error 503 Service Unavailable".into()))
    }
}

/// Image provider that always delivers the full batch
pub struct WorkingProvider;

#[async_trait]
impl ImageProvider for WorkingProvider {
    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub/working-model"
    }

    async fn generate(&self, _prompt: &str, count: usize) -> Result<Vec<ImageArtifact>> {
        (0..count)
            .map(|i| ImageArtifact::remote(&format!("https://cdn.example.com/{}.png", i)))
            .collect()
    }
}

pub fn build_app(llm: Arc<dyn LlmClient>, providers: Vec<Arc<dyn ImageProvider>>) -> Router {
    let engine = Engine::new(
        llm,
        ImageGateway::new(providers),
        EngineLimits {
            max_images: 8,
            history_limit: 12,
        },
    );
    create_router(AppState::new(engine))
}

/// App whose only image provider is down, so every image is a placeholder
pub fn placeholder_app() -> Router {
    build_app(Arc::new(ScriptedLlm), vec![DownProvider::new()])
}

pub async fn send_raw(app: &Router, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send_raw(app, "POST", uri, Body::from(body.to_string())).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send_raw(app, "GET", uri, Body::empty()).await
}
