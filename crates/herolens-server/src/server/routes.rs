//! HTTP routes and handlers

use crate::render;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{debug, error, info};

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Body of a successful `/analyze` response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Predicted class label
    pub result: String,

    /// `<img>` tag with the probability chart
    pub plot: String,
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn render_metrics(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Classify the uploaded image and chart the class probabilities
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    metrics::counter!("herolens_requests_total").increment(1);
    let start = Instant::now();

    let image_bytes = read_file_field(multipart).await?;
    debug!("Received {} byte upload", image_bytes.len());

    let predictor = state.predictor.clone();
    let charts = state.charts.clone();
    let (result, plot) = tokio::task::spawn_blocking(move || {
        render::render_prediction(&predictor, &charts, &image_bytes)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Analysis task failed: {}", e)))??;

    let elapsed = start.elapsed();
    metrics::histogram!("herolens_inference_latency_us").record(elapsed.as_micros() as f64);
    info!("Classified upload as '{}' in {:?}", result, elapsed);

    Ok(Json(AnalyzeResponse { result, plot }))
}

/// Pull the bytes of the `file` field out of the form
async fn read_file_field(mut multipart: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return Ok(field.bytes().await?.to_vec());
        }
    }

    Err(AppError::InvalidRequest(format!(
        "Missing multipart field '{}'",
        FILE_FIELD
    )))
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    Multipart(MultipartError),
    InternalError(String),
}

impl From<herolens_core::Error> for AppError {
    fn from(err: herolens_core::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Multipart(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
            AppError::Multipart(err) => (err.status(), "invalid_request", err.body_text()),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        if status.is_server_error() {
            error!("Request failed: {}", message);
        }
        metrics::counter!("herolens_errors_total", "type" => kind).increment(1);

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
