use anyhow::Context;
use clap::Parser;
use pix_gateway::app::{config::Config, router::build_router};
use pix_gateway::services::{GatewayService, HttpUpstream};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pix-gateway", about = "Pix charge gateway in front of the payment API")]
struct Cli {
    /// TOML file overriding environment settings
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    info!("Starting Pix gateway on port {}", config.server_port);

    let upstream = Arc::new(HttpUpstream::new(&config).context("building upstream HTTP client")?);
    let service = Arc::new(GatewayService::new(config.clone(), upstream));
    let app = build_router(service);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
