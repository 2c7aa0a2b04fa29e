//! Integration tests for the HTTP endpoints
//!
//! The router runs in-process via `tower::ServiceExt::oneshot` against a
//! registry of stub models.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{SlowModel, StubOutputs, png_bytes, registry_with_sentiment, stub_registry};
use foodai::server::{ServerConfig, ServerState, build_router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const BOUNDARY: &str = "foodai-test-boundary";

fn app_with(config: ServerConfig, outputs: StubOutputs) -> Router {
    let stubs = stub_registry(outputs);
    build_router(Arc::new(ServerState::new(config, stubs.registry)))
}

fn app() -> Router {
    app_with(ServerConfig::default(), StubOutputs::default())
}

fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let response = app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Welcome to Food AI API" })
    );
}

#[tokio::test]
async fn predict_classifies_uploaded_image() {
    let response = app()
        .oneshot(upload(multipart_body("file", Some("pizza.png"), &png_bytes(224, 224))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["food"], "Pizza");
    assert_eq!(body["confidence"], 90.0);
}

#[tokio::test]
async fn predict_accepts_first_file_part_under_another_name() {
    let response = app()
        .oneshot(upload(multipart_body("image", Some("dinner.png"), &png_bytes(50, 80))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["food"], "Pizza");
}

#[tokio::test]
async fn predict_rejects_non_image_upload() {
    let response = app()
        .oneshot(upload(multipart_body("file", Some("notes.txt"), b"hello there")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("cannot identify image file"));
    assert_eq!(body["error"]["code"], "INVALID_IMAGE");
}

#[tokio::test]
async fn predict_without_file_is_bad_request() {
    let response = app()
        .oneshot(upload(multipart_body("comment", None, b"no image here")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["detail"], "No file uploaded");
}

#[tokio::test]
async fn predict_requires_multipart() {
    let response = app()
        .oneshot(post_json("/predict", json!({ "file": "pizza.png" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sentiment_echoes_original_text() {
    let text = "The food was absolutely amazing and delicious!!!";
    let response = app()
        .oneshot(post_json("/predict_sentiment", json!({ "text": text })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["sentiment"], "Positive");
    assert_eq!(body["confidence"], 87.0);
    assert_eq!(body["text"], text);
}

#[tokio::test]
async fn sentiment_boundary_score_is_negative() {
    let app = app_with(
        ServerConfig::default(),
        StubOutputs {
            sentiment: vec![0.5],
            ..Default::default()
        },
    );
    let response = app
        .oneshot(post_json("/predict_sentiment", json!({ "text": "the food" })))
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["sentiment"], "Negative");
    assert_eq!(body["confidence"], 50.0);
}

#[tokio::test]
async fn sentiment_rejects_text_without_letters() {
    let response = app()
        .oneshot(post_json("/predict_sentiment", json!({ "text": "!!! 42 ???" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "Text is empty after cleaning");
    assert_eq!(body["error"]["code"], "EMPTY_TEXT");
}

#[tokio::test]
async fn recommend_food_returns_raw_and_display_names() {
    let response = app()
        .oneshot(post_json(
            "/recommend_food",
            json!({ "text": "I want raw fish on rice" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "food_class": "sushi", "food_name": "Sushi", "confidence": 0.8123 })
    );
}

#[tokio::test]
async fn recommend_food_errors_when_no_word_is_known() {
    let response = app()
        .oneshot(post_json(
            "/recommend_food",
            json!({ "text": "chocolate lava cake" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "No known words found in input");
    assert_eq!(body["error"]["code"], "NO_KNOWN_WORDS");
}

#[tokio::test]
async fn recommend_food_rejects_blank_text() {
    let response = app()
        .oneshot(post_json("/recommend_food", json!({ "text": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["detail"], "Input text is empty");
}

#[tokio::test]
async fn malformed_json_is_unprocessable() {
    let response = app()
        .oneshot(post_json("/predict_sentiment", json!({ "review": "great" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let response = app().oneshot(get("/predict_calories")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn readiness_lists_loaded_models() {
    let response = app().oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["models"], json!(["food_image", "sentiment", "text_food"]));
}

#[tokio::test]
async fn health_is_always_ok() {
    let response = app().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn metrics_route_absent_without_recorder() {
    let response = app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let request = Request::builder()
        .uri("/")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");

    let response = app().oneshot(get("/")).await.unwrap();
    assert!(!response.headers()["x-request-id"].is_empty());
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/predict_sentiment")
        .header(header::ORIGIN, "https://food.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(preflight).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn cors_restricted_to_configured_origin() {
    let config = ServerConfig {
        cors_origins: vec!["http://localhost:3000".into()],
        ..Default::default()
    };

    let allowed = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app_with(config.clone(), StubOutputs::default())
        .oneshot(allowed)
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );

    let foreign = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app_with(config, StubOutputs::default())
        .oneshot(foreign)
        .await
        .unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn oversized_json_body_is_rejected() {
    let config = ServerConfig {
        max_body_size_mb: 1,
        ..Default::default()
    };
    let text = "a".repeat(2 * 1024 * 1024);
    let response = app_with(config, StubOutputs::default())
        .oneshot(post_json("/predict_sentiment", json!({ "text": text })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn slow_inference_still_answers_with_prediction() {
    let slow = Arc::new(SlowModel::new(
        "sentiment",
        vec![0.87],
        Duration::from_millis(1500),
    ));
    let app = build_router(Arc::new(ServerState::new(
        ServerConfig::default(),
        registry_with_sentiment(slow),
    )));

    let response = app
        .oneshot(post_json(
            "/predict_sentiment",
            json!({ "text": "the food was amazing" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["sentiment"], "Positive");
    assert_eq!(body["confidence"], 87.0);
}
