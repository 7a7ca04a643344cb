use anyhow::Result;
use clap::Parser;
use herolens_server::{initialize, serve, Cli, ServerConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Artifact: {}", config.artifact_url);
    info!("Model directory: {}", config.model_dir.display());

    // Phase one: nothing is served until the model is loaded
    let predictor = initialize(&config).await?;
    info!(
        "Model '{}' ready with classes: {}",
        predictor.name(),
        predictor.classes().join(", ")
    );

    if !cli.should_serve() {
        info!("Setup complete; pass `serve` to start the HTTP server");
        return Ok(());
    }

    let metrics = init_metrics()?;
    serve(predictor, config, Some(metrics)).await
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("herolens=debug,herolens_server=debug,herolens_classifiers=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("herolens=info,herolens_server=info,herolens_classifiers=info,tower_http=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the Prometheus recorder and describe the exported metrics
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!("herolens_requests_total", "Total number of /analyze requests");
    metrics::describe_counter!("herolens_errors_total", "Total number of failed requests by type");
    metrics::describe_histogram!(
        "herolens_inference_latency_us",
        metrics::Unit::Microseconds,
        "Decode, inference and chart rendering time per request"
    );

    Ok(handle)
}
