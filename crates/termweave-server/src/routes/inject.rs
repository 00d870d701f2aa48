//! Term injection runs.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use termweave_core::{InjectionOptions, Term};
use termweave_runtime::Orchestrator;
use tracing::{error, info};

use super::json_body;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/inject", post(inject))
}

#[derive(Deserialize)]
struct InjectRequest {
    #[serde(default)]
    content: String,
    #[serde(default)]
    terms: Vec<Term>,
    /// Falls back to the configured defaults.
    options: Option<InjectionOptions>,
    /// Falls back to the configured seed, then to entropy.
    seed: Option<u64>,
}

/// POST /api/inject — insert missing terms and report what changed.
async fn inject(
    State(state): State<Arc<AppState>>,
    body: Result<Json<InjectRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(body) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let options = req.options.unwrap_or_else(|| state.config.defaults.clone());
    let orchestrator = match req.seed.or(state.config.seed) {
        Some(seed) => Orchestrator::with_seed(options, seed),
        None => Orchestrator::new(options),
    };

    let run = tokio::task::spawn_blocking(move || orchestrator.run(&req.content, &req.terms)).await;
    let result = match run {
        Ok(result) => result,
        Err(e) => {
            error!("Injection run panicked: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "injection run failed" })),
            )
                .into_response();
        }
    };

    state.runs.write().record(&result);
    info!(
        "Run {} served: {} added, {} failed",
        result.run_id,
        result.added_terms.len(),
        result.failed_terms.len()
    );
    Json(result).into_response()
}
