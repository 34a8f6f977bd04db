use anyhow::{Context, Result};
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use restaurants_mcp::{GatewayOptions, RapidApiGateway, RestaurantsServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries protocol frames.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            error!("Failed to read .env file: {}", e);
        }
    }

    let options = GatewayOptions::from_env()
        .context("KEY environment variable is not set or configuration is invalid")?;
    let gateway = RapidApiGateway::new(options).context("failed to build upstream gateway")?;

    info!("Starting Restaurants MCP Server with stdio transport...");
    let service = RestaurantsServer::new(gateway)
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;

    tokio::select! {
        quit = service.waiting() => {
            if let Err(e) = quit {
                error!("MCP server stopped with error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, shutting down gracefully...");
        }
    }

    info!("Restaurants MCP Server shutting down...");
    Ok(())
}
