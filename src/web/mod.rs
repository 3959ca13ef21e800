// src/web/mod.rs
// HTTP surface for the engine

pub mod api;
pub mod error;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Create the web server router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::health))
        .route("/chat", post(api::chat))
        .route("/refine", post(api::refine))
        .route("/session/{session_id}", get(api::get_session))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
