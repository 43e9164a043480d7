use bfhl_service::config::BfhlConfig;
use bfhl_service::services::metrics::init_metrics;
use bfhl_service::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = BfhlConfig::load()?;

    init_tracing(
        "bfhl-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    if let Err(e) = init_metrics() {
        tracing::warn!("Metrics disabled: {}", e);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        official_email = %config.official_email,
        "Starting BFHL service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
