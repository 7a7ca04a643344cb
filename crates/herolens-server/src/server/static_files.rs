use crate::server::routes::AppError;
use crate::state::AppState;
use axum::{extract::State, response::Html};
use std::path::Path;
use tower_http::services::ServeDir;

/// Serve the upload page, read from disk on every request
pub async fn homepage(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let path = &state.config.index_path;
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(Html(html))
}

/// Files under `dir`, served verbatim
pub fn static_service(dir: &Path) -> ServeDir {
    ServeDir::new(dir)
}
