//! Catalog module entry point.
//!
//! Serves the plugin routes and runs the processing engine until ctrl-c.

use catalog_module::{Dependencies, LogFormat, ModuleConfig, ModuleError};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<(), ModuleError> {
    dotenv().ok();

    let config = ModuleConfig::from_env()?;
    init_tracing(config.log_format);

    let deps = Dependencies::new(&config).await?;

    let engine = deps.engine.clone();
    let engine_handle = tokio::spawn(async move { engine.run().await });

    let listener = TcpListener::bind(config.http_addr).await?;
    info!(addr = %config.http_addr, prefix = %config.route_prefix(), "Catalog module listening");

    axum::serve(listener, deps.router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    deps.engine.shutdown();
    match engine_handle.await {
        Ok(result) => result?,
        Err(e) => error!(error = %e, "Processing engine task failed"),
    }

    info!("Catalog module stopped");
    Ok(())
}
