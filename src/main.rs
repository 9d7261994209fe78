//! Temperature Conversion Service (tempconv)
//!
//! An MCP server for temperature unit conversion.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use tempconv::build_info;
use tempconv::config::ServiceConfig;
use tempconv::mcp::TempConvService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env()?;

    // Logs go to stderr; stdout carries the MCP stdio transport
    let filter = config.env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    tracing::info!(
        max_batch_size = config.max_batch_size,
        default_precision = %config.default_precision,
        "Starting MCP server on stdio"
    );

    let service = TempConvService::new(config);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;

    server.waiting().await?;

    Ok(())
}
