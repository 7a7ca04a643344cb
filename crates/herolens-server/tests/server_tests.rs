//! Router tests driven through `tower::ServiceExt::oneshot`

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use herolens_core::DEFAULT_CLASSES;
use herolens_server::{build_app, AnalyzeResponse};
use tower::ServiceExt;

fn app(dir: &std::path::Path) -> Router {
    build_app(common::test_state(dir))
}

fn analyze_request(field: &str, data: &[u8]) -> Request<Body> {
    let (content_type, body) = common::multipart_body(field, data);
    Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

#[tokio::test]
async fn test_homepage_served_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("id=\"upload\""));

    // Edits show up without a restart
    std::fs::write(dir.path().join("view/index.html"), "<p>edited</p>").unwrap();
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_bytes(response).await, b"<p>edited</p>");
}

#[tokio::test]
async fn test_static_files() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(Request::get("/static/client.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"console.log('hi');");

    let response = app
        .oneshot(Request::get("/static/missing.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analyze_returns_label_and_png_plot() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(analyze_request("file", &common::png_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: AnalyzeResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();

    assert!(DEFAULT_CLASSES.contains(&body.result.as_str()));
    assert_eq!(body.result, "batman");

    let payload = body
        .plot
        .strip_prefix("<img src='data:image/png;base64,")
        .and_then(|rest| rest.strip_suffix("'>"))
        .expect("plot is an inline PNG img tag");
    let png = STANDARD.decode(payload).unwrap();
    let chart = image::load_from_memory_with_format(&png, image::ImageFormat::Png).unwrap();
    assert_eq!((chart.width(), chart.height()), (1000, 500));
}

#[tokio::test]
async fn test_bad_image_fails_only_that_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(analyze_request("file", b"this is not an image"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body["error"]["message"].as_str().unwrap().contains("decode"));

    let response = app
        .oneshot(analyze_request("file", &common::png_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_file_field_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(analyze_request("picture", &common::png_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_allows_any_origin_with_custom_headers() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-requested-with,content-type")
        .body(Body::empty())
        .unwrap();

    let response = app(dir.path()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("x-requested-with"));
    assert!(allowed.contains("content-type"));
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn test_metrics_exposition() {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let dir = tempfile::tempdir().unwrap();
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    metrics::with_local_recorder(&recorder, || {
        metrics::counter!("herolens_requests_total").increment(3);
    });

    let state = common::test_state(dir.path()).with_metrics(handle);
    let response = build_app(state)
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("herolens_requests_total 3"), "{text}");
}

#[tokio::test]
async fn test_metrics_without_recorder_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}
