use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use irsim_core::EngineConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

const CORPUS: &str = "--- Document: a.txt ---\nRust is great. rust systems programming.\n\n--- Document: b.txt ---\nLearning rust.\n\n--- Document: c.txt ---\nGardening with tomatoes.\n";

fn app() -> Router { irsim_server::build_app(EngineConfig::default()) }

async fn post(app: Router, body: Value) -> (StatusCode, Value) {
    let req = Request::post("/api/simulate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let resp = app().oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn vsm_returns_ranked_results() {
    let (status, json) = post(app(), json!({"methodId": "vsm", "query": "rust", "documents": CORPUS})).await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["rankedDocuments"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["name"], "b.txt");
    assert_eq!(arr[1]["name"], "a.txt");
    assert!(arr[0]["score"].as_f64().unwrap() >= arr[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn regex_highlights() {
    let (status, json) = post(app(), json!({"methodId": "regex", "query": "rust", "documents": CORPUS})).await;
    assert_eq!(status, StatusCode::OK);
    let matches = json["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["highlights"], json!([[0, 4], [15, 19]]));
}

#[tokio::test]
async fn clustering_uses_query_as_k() {
    let (status, json) = post(app(), json!({"methodId": "clustering", "query": "2", "documents": CORPUS})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["numClusters"], 2);
    assert_eq!(json["clusters"].as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn engine_errors_are_400_with_error_field() {
    for (method, query, expected) in [
        ("boolean", "(rust AND", "malformed boolean query"),
        ("regex", "(", "invalid regular expression"),
        ("clustering", "1", "invalid number of clusters"),
        ("vsm", "   ", "the query is empty"),
    ] {
        let (status, json) = post(app(), json!({"methodId": method, "query": query, "documents": CORPUS})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert!(json["error"].as_str().unwrap().starts_with(expected), "{method}: {json}");
    }
}

#[tokio::test]
async fn empty_corpus_is_rejected() {
    let (status, json) = post(app(), json!({"methodId": "bm25", "query": "rust", "documents": "\n\n"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn unknown_method_is_422() {
    let (status, json) = post(app(), json!({"methodId": "pagerank", "query": "rust", "documents": CORPUS})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn relevance_feedback_round() {
    let body = json!({"methodId": "relevance", "query": "rust", "documents": CORPUS, "relevantDocIds": [1]});
    let (status, json) = post(app(), body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["expandedQuery"].as_str().unwrap().starts_with("rust "));

    let body = json!({"methodId": "relevance", "query": "rust", "documents": CORPUS, "relevantDocIds": []});
    let (status, json) = post(app(), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "mark at least one document as relevant");
}

async fn allow_origin(cors: Option<&str>, origin: &str) -> Option<String> {
    let app = Router::new().route("/health", axum::routing::get(|| async { "ok" })).layer(irsim_server::cors_layer(cors));
    let req = Request::get("/health").header(header::ORIGIN, origin).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn cors_defaults_to_any_origin() {
    assert_eq!(allow_origin(None, "http://elsewhere.test").await.as_deref(), Some("*"));
    assert_eq!(allow_origin(Some(" , "), "http://elsewhere.test").await.as_deref(), Some("*"));
}

#[tokio::test]
async fn cors_restricts_to_listed_origins() {
    let listed = Some("http://localhost:3000, http://127.0.0.1:3000");
    assert_eq!(allow_origin(listed, "http://127.0.0.1:3000").await.as_deref(), Some("http://127.0.0.1:3000"));
    assert_eq!(allow_origin(listed, "http://elsewhere.test").await, None);
}
