// src/web/api.rs
// REST API handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Serialize;

use super::error::ApiResult;
use super::state::AppState;
use crate::engine::{ChatResponse, GenerationRequest, RefineRequest, SessionView};

pub const APP_NAME: &str = "Vizzy Chat";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub app: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        app: APP_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    Ok(Json(state.engine.chat(request).await?))
}

pub async fn refine(
    State(state): State<AppState>,
    payload: Result<Json<RefineRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    Ok(Json(state.engine.refine(request).await?))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionView>> {
    Ok(Json(state.engine.session(&session_id).await?))
}
