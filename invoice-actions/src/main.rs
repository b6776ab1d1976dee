use dotenvy::dotenv;
use invoice_actions::config::get_configuration;
use invoice_actions::startup::Application;
use service_core::observability::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let app = &configuration.application;
    init_tracing(
        &app.service_name,
        &app.log_level,
        app.otlp_endpoint.as_deref(),
    );

    invoice_actions::services::metrics::init_metrics();

    let application = Application::build(configuration).await?;
    tracing::info!("Starting invoice-actions on {}", application.addr());
    application.run_until_stopped().await?;

    Ok(())
}
