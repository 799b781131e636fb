//! Server startup integration tests.
//!
//! The image server can be built from configuration alone and advertises its
//! tools and resources.

#[cfg(test)]
use doubao_mcp_common::Config;
#[cfg(test)]
use rmcp::ServerHandler;

/// Test configuration for integration tests.
#[cfg(test)]
fn test_config() -> Config {
    Config::from_lookup(|name| match name {
        "DOUBAO_API_KEY" => Some("sk-workspace".to_string()),
        "API_MODEL_ID" => Some("doubao-seedream-3-0-t2i-250415".to_string()),
        _ => None,
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doubao_mcp_common::{McpServerBuilder, Transport, shutdown_channel};
    use doubao_mcp_image::{GENERATE_IMAGE_TOOL, ImageServer};

    #[test]
    fn test_image_server_startup() {
        let server = ImageServer::new(test_config());
        let info = server.get_info();

        let instructions = info.instructions.as_ref().unwrap().to_lowercase();
        assert!(instructions.contains("image"), "Server instructions should mention 'image'");
        assert!(instructions.contains(GENERATE_IMAGE_TOOL));
    }

    #[test]
    fn test_image_server_capabilities() {
        let info = ImageServer::new(test_config()).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }

    #[test]
    fn test_default_configuration_reaches_server() {
        let server = ImageServer::new(test_config());
        let config = server.config();
        assert_eq!(config.base_url, doubao_mcp_common::config::DEFAULT_BASE_URL);
        assert!(config.save_dir.ends_with("images"));
        assert_eq!(config.port, 8080);
    }

    /// An HTTP server on an ephemeral port stops when the shutdown sender fires.
    #[tokio::test]
    async fn test_http_server_shuts_down_on_signal() {
        let (tx, rx) = shutdown_channel();
        let server = ImageServer::new(test_config());

        // Signalled before start: the server binds, then stops at once
        let _ = tx.send(());
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            McpServerBuilder::new(server)
                .with_transport(Transport::http(0))
                .with_shutdown(rx)
                .run(),
        )
        .await
        .expect("server should stop");
        assert!(result.is_ok());
    }
}
