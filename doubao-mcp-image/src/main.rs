//! Doubao MCP Image Server
//!
//! MCP server for text-to-image generation using Volcano Engine Doubao models.

use anyhow::Result;
use clap::Parser;
use doubao_mcp_common::tracing::init_tracing;
use doubao_mcp_common::{Config, McpServerBuilder, TransportArgs};
use doubao_mcp_image::ImageServer;

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "doubao-mcp-image")]
#[command(about = "MCP server for image generation using Volcano Engine Doubao models")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("doubao-mcp-image server starting...");

    let args = Args::parse();

    let config = Config::from_env()?;
    tracing::info!(
        model_id = %config.model_id,
        base_url = %config.base_url,
        save_dir = %config.save_dir.display(),
        "Configuration loaded"
    );

    let server = ImageServer::new(config);

    let transport = args.transport.into_transport();
    tracing::info!(transport = %transport, "Starting MCP server");

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
