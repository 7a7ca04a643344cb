use crate::config::ServerConfig;
use crate::render::ChartRenderer;
use herolens_classifiers::Predictor;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded classifier, read-only for the life of the process
    pub predictor: Arc<Predictor>,

    /// Chart renderer with the preloaded font database
    pub charts: ChartRenderer,

    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Prometheus handle for `/metrics`; `None` when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(predictor: Predictor, config: ServerConfig) -> Self {
        Self {
            predictor: Arc::new(predictor),
            charts: ChartRenderer::new(),
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
