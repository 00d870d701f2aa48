//! Response shapes of the HTTP API, exercised through the router without a
//! listening socket.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use termweave_core::EngineConfig;
use termweave_server::{build_router, check_files, AppState};
use tower::ServiceExt;

const ARTICLE: &str = "<h2>Getting Started</h2>\
<p>Content writing is a craft that rewards patience. Writers who plan each article \
carefully tend to produce clearer and more useful pages for readers.</p>";

fn test_router() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(EngineConfig::default()));
    (build_router(state.clone()), state)
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_shape() {
    let (router, _) = test_router();
    let response = router
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "ok");
    assert!(health["version"].is_string());
    assert_eq!(health["runs"]["total"], 0);
    assert!(health["runs"]["earlyExits"].is_number());
}

#[tokio::test]
async fn test_analyze_shape() {
    let (router, _) = test_router();
    let (status, analysis) = post_json(
        router,
        "/api/analyze",
        json!({
            "content": ARTICLE,
            "terms": [
                {"text": "content", "importance": 60},
                {"text": "seo", "category": "basic", "importance": 90},
            ],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(analysis["rawScore"], 50);
    assert_eq!(analysis["totalTerms"], 2);
    assert_eq!(analysis["usedTerms"][0]["term"]["text"], "content");
    assert_eq!(analysis["usedTerms"][0]["occurrenceCount"], 1);
    assert!(analysis["usedTerms"][0]["matchPositions"].is_array());
    assert_eq!(analysis["criticalMissing"][0]["text"], "seo");
    assert_eq!(analysis["bodyMissing"].as_array().unwrap().len(), 1);
    assert!(analysis["headerMissing"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_inject_shape_and_stats() {
    let (router, state) = test_router();
    let (status, result) = post_json(
        router,
        "/api/inject",
        json!({
            "content": ARTICLE,
            "terms": [{"text": "seo", "importance": 90}],
            "options": {"targetCoverage": 100},
            "seed": 7,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["addedTerms"], json!(["seo"]));
    assert_eq!(result["finalCoverage"]["rawScore"], 100);
    assert_eq!(result["insertionReport"][0]["placementKind"], "paragraph");
    assert!(result["insertionReport"][0]["templateUsed"].is_string());
    assert!(result["finalContent"]
        .as_str()
        .unwrap()
        .starts_with("<h2>Getting Started</h2>"));
    assert_ne!(result["inputDigest"], result["outputDigest"]);
    assert!(result["runId"].is_string());
    assert!(result["completedAt"].is_string());

    let runs = state.runs.read();
    assert_eq!(runs.total, 1);
    assert_eq!(runs.insertions, 1);
}

#[tokio::test]
async fn test_inject_is_reproducible_with_seed() {
    let body = json!({
        "content": ARTICLE,
        "terms": [{"text": "seo"}],
        "seed": 42,
    });
    let (_, first) = post_json(test_router().0, "/api/inject", body.clone()).await;
    let (_, second) = post_json(test_router().0, "/api/inject", body).await;
    assert_eq!(first["finalContent"], second["finalContent"]);
}

#[tokio::test]
async fn test_inject_early_exit_counts() {
    let (router, state) = test_router();
    let (status, result) = post_json(
        router,
        "/api/inject",
        json!({"content": ARTICLE, "terms": [{"text": "content"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["state"], "earlyExit");
    assert_eq!(result["finalContent"], ARTICLE);
    assert_eq!(state.runs.read().early_exits, 1);
}

#[tokio::test]
async fn test_related_shape() {
    let (router, _) = test_router();
    let (status, related) = post_json(router, "/api/related", json!({"term": "SEO"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(related["term"], "SEO");
    assert_eq!(related["topics"], json!(["seo"]));
    let words = related["related"].as_array().unwrap();
    assert!(words.contains(&json!("content")));
    assert!(words.contains(&json!("strategy")));
}

#[tokio::test]
async fn test_malformed_requests_are_400() {
    let (status, body) = post_json(test_router().0, "/api/related", json!({"term": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = post_json(test_router().0, "/api/analyze", json!({"terms": "seo"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let response = test_router()
        .0
        .oneshot(
            Request::post("/api/inject")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_check_files() {
    let dir = tempfile::tempdir().unwrap();
    let html = dir.path().join("page.html");
    let terms = dir.path().join("terms.json");
    std::fs::write(&html, ARTICLE).unwrap();
    std::fs::write(&terms, r#"[{"text": "article"}, {"text": "keyword", "category": "title"}]"#)
        .unwrap();

    let analysis = check_files(&html, &terms).unwrap();
    assert_eq!(analysis.raw_score, 50);
    assert_eq!(analysis.header_missing[0].text, "keyword");

    assert!(check_files(&dir.path().join("absent.html"), &terms).is_err());
    std::fs::write(&terms, "not a list").unwrap();
    assert!(check_files(&html, &terms).is_err());
}
