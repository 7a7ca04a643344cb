//! First lifecycle phase: make the model available before anything is served

use crate::config::ServerConfig;
use herolens_classifiers::{ArtifactFetcher, FetchOutcome, ModelLoader, Predictor};
use herolens_core::{Error, Result};

/// Fetch the artifact if needed and load it.
///
/// Runs to completion before the listener is bound; any error here is fatal.
pub async fn initialize(config: &ServerConfig) -> Result<Predictor> {
    initialize_with(config, ModelLoader::new(config.model.clone())).await
}

/// [`initialize`] with a caller-provided loader
pub async fn initialize_with(config: &ServerConfig, loader: ModelLoader) -> Result<Predictor> {
    let dest = config.artifact_path();
    match ArtifactFetcher::new().ensure(&config.artifact_url, &dest).await? {
        FetchOutcome::Present => tracing::info!("Using artifact at {}", dest.display()),
        FetchOutcome::Downloaded { bytes } => {
            tracing::info!("Fetched {} byte artifact to {}", bytes, dest.display())
        }
    }

    let dir = config.model_dir.clone();
    let name = config.artifact_name.clone();
    tokio::task::spawn_blocking(move || loader.load(&dir, &name))
        .await
        .map_err(|e| Error::internal(format!("Model loading task failed: {}", e)))?
}
