//! Related-term lookup.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use termweave_analyze::{matching_topics, related_terms};

use super::{bad_request, json_body};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/related", post(related))
}

#[derive(Deserialize)]
struct RelatedRequest {
    term: String,
}

/// POST /api/related
async fn related(body: Result<Json<RelatedRequest>, JsonRejection>) -> Response {
    let req = match json_body(body) {
        Ok(req) => req,
        Err(response) => return response,
    };
    if req.term.trim().is_empty() {
        return bad_request("term must not be empty");
    }

    Json(serde_json::json!({
        "term": req.term,
        "topics": matching_topics(&req.term),
        "related": related_terms(&req.term),
    }))
    .into_response()
}
