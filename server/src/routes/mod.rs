//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The persistent server exposes the API under `/api`. The stateless function
//! adapter is mounted under its configured base path as well, so both
//! prefixes answer from the same store in one process.

pub mod elements;

use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::Json;
use axum::routing::{any, get};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_route = format!("{}/{{*rest}}", elements::API_PREFIX);
    let function_route = format!("{}/{{*rest}}", state.config.function_base_path);
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route(&api_route, any(elements::invoke_api))
        .route(&function_route, any(elements::invoke_function))
        .route("/healthz", get(healthz))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "records": state.store.count().await }))
}
