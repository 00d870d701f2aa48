//! Coverage analysis without mutation.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use termweave_core::Term;

use super::json_body;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analyze", post(analyze))
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    content: String,
    #[serde(default)]
    terms: Vec<Term>,
}

/// POST /api/analyze — coverage of `terms` in `content`.
async fn analyze(body: Result<Json<AnalyzeRequest>, JsonRejection>) -> Response {
    let req = match json_body(body) {
        Ok(req) => req,
        Err(response) => return response,
    };
    Json(termweave_analyze::analyze(&req.content, &req.terms)).into_response()
}
