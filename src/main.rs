use anyhow::Result;
use std::sync::Arc;
use stripe_processor_connection::{server, settings, ProcessorConnection, StripeConnection};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load configuration from environment
    let cfg = settings::Config::from_env();

    // Validate Stripe configuration
    if cfg.stripe.api_key.is_empty() {
        tracing::error!("STRIPE_API_KEY not set; exiting");
        return Ok(());
    }

    let connection = StripeConnection::new(&cfg.stripe)?;
    tracing::info!(
        processor = connection.name(),
        api_base = %cfg.stripe.api_base,
        port = cfg.server_port,
        "Starting Stripe processor connection"
    );

    server::run_server(cfg.server_port, Arc::new(connection), cfg.shutdown_grace).await?;

    tracing::info!("Processor connection stopped");
    Ok(())
}
