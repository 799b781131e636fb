//! MCP Server implementation for the Doubao image server.
//!
//! This module provides the MCP server handler that exposes:
//! - `doubao_generate_image` tool for text-to-image generation
//! - Resources for supported sizes and the effective configuration

use crate::handler::{GenerationOutcome, ImageHandler};
use crate::params::{
    GenerateImageParams, DEFAULT_GUIDANCE_SCALE, DEFAULT_SIZE, RANDOM_SEED, SUPPORTED_SIZES,
};
use crate::resources;
use doubao_mcp_common::config::Config;
use doubao_mcp_common::error::Error;
use rmcp::{
    model::{
        CallToolResult, Content, JsonObject, ListResourcesResult, ListToolsResult, RawResource,
        ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo, Tool,
    },
    ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the image generation tool.
pub const GENERATE_IMAGE_TOOL: &str = "doubao_generate_image";

/// MCP Server for image generation.
#[derive(Clone)]
pub struct ImageServer {
    handler: Arc<ImageHandler>,
}

/// Tool parameters wrapper for doubao_generate_image.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateImageToolParams {
    /// Text prompt describing the image to generate
    pub prompt: String,
    /// Output size as WIDTHxHEIGHT (default: 1024x1024)
    #[serde(default)]
    pub size: Option<String>,
    /// Random seed, 0 to 2147483647, or -1 for a random seed (default: -1)
    #[serde(default)]
    pub seed: Option<i64>,
    /// How strictly the image follows the prompt, 1.0 to 10.0 (default: 8.0)
    #[serde(default)]
    pub guidance_scale: Option<f64>,
    /// Whether to add a watermark (default: true)
    #[serde(default)]
    pub watermark: Option<bool>,
    /// Prefix for the saved file name: letters, digits, underscores and hyphens, up to 20 characters
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl From<GenerateImageToolParams> for GenerateImageParams {
    fn from(params: GenerateImageToolParams) -> Self {
        Self {
            prompt: params.prompt,
            size: params.size.unwrap_or_else(|| DEFAULT_SIZE.to_string()),
            seed: params.seed.unwrap_or(RANDOM_SEED),
            guidance_scale: params.guidance_scale.unwrap_or(DEFAULT_GUIDANCE_SCALE),
            watermark: params.watermark.unwrap_or(true),
            // An empty prefix from the caller means "no prefix"
            file_prefix: params.file_prefix.filter(|p| !p.is_empty()),
        }
    }
}

impl ImageServer {
    /// Create a new ImageServer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self::from_handler(ImageHandler::new(config))
    }

    /// Create a server around an existing handler.
    pub fn from_handler(handler: ImageHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// The configuration the server was built with.
    pub fn config(&self) -> &Config {
        &self.handler.config
    }

    /// Run one tool invocation.
    ///
    /// Every outcome, including an unknown tool name or malformed arguments,
    /// is reported as a `CallToolResult`.
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.dispatch(name, arguments).await {
            Ok(outcome) => success_result(&outcome),
            Err(err) => {
                warn!(tool = name, category = err.category(), error = %err, "Tool call failed");
                error_result(&err)
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> Result<GenerationOutcome, Error> {
        if name != GENERATE_IMAGE_TOOL {
            return Err(Error::unknown_tool(name));
        }

        let args = serde_json::Value::Object(arguments.unwrap_or_default());
        let tool_params: GenerateImageToolParams = serde_json::from_value(args)
            .map_err(|e| Error::validation(format!("Invalid parameters: {}", e)))?;

        info!(size = ?tool_params.size, "Generating image");
        self.handler.generate_image(tool_params.into()).await
    }

    /// Tools exposed by this server.
    pub fn tools() -> Vec<Tool> {
        let schema = schemars::schema_for!(GenerateImageToolParams);
        let schema_value = serde_json::to_value(&schema).unwrap_or_default();
        let input_schema = match schema_value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        let sizes = SUPPORTED_SIZES
            .iter()
            .map(|s| format!("{} ({})", s.id, s.label))
            .collect::<Vec<_>>()
            .join(", ");

        vec![Tool {
            name: Cow::Borrowed(GENERATE_IMAGE_TOOL),
            description: Some(Cow::Owned(format!(
                "Generate an image from a text prompt using a Doubao text-to-image model. \
                 The image is downloaded and saved locally; the result reports the saved path \
                 and generation details. Supported sizes: {}.",
                sizes
            ))),
            input_schema,
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        }]
    }

    /// Resources exposed by this server.
    pub fn resources() -> Vec<Resource> {
        let resource = |uri: &str, name: &str, description: &str| Resource {
            raw: RawResource {
                uri: uri.to_string(),
                name: name.to_string(),
                title: None,
                description: Some(description.to_string()),
                mime_type: Some("application/json".to_string()),
                size: None,
                icons: None,
                meta: None,
            },
            annotations: None,
        };

        vec![
            resource(resources::SIZES_URI, "Supported Sizes", "Output sizes accepted by the image tool"),
            resource(
                resources::CONFIG_URI,
                "Server Configuration",
                "Model, API base URL and save directory in use",
            ),
        ]
    }

    /// Contents of the resource at `uri`, if it exists.
    pub fn resource_json(&self, uri: &str) -> Option<String> {
        match uri {
            resources::SIZES_URI => Some(resources::sizes_resource_json()),
            resources::CONFIG_URI => Some(resources::config_resource_json(self.config())),
            _ => None,
        }
    }
}

fn success_result(outcome: &GenerationOutcome) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(outcome.summary())],
        is_error: Some(false),
        meta: None,
        structured_content: serde_json::to_value(outcome).ok(),
    }
}

fn error_result(err: &Error) -> CallToolResult {
    let message = err.to_string();
    CallToolResult {
        content: vec![Content::text(format!(
            "Image generation failed [{}]: {}",
            err.category(),
            message
        ))],
        is_error: Some(true),
        meta: None,
        structured_content: Some(serde_json::json!({
            "category": err.category(),
            "message": message,
        })),
    }
}

impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server using Volcano Engine Doubao text-to-image models. \
                 Use doubao_generate_image to create an image from a text prompt; the image \
                 is saved locally and the saved path is returned. Read doubao://sizes for \
                 the supported sizes."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: Self::tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { Ok(self.invoke(&params.name, params.arguments).await) }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing resources");
            Ok(ListResourcesResult {
                resources: Self::resources(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = &params.uri;
            debug!(uri = %uri, "Reading resource");

            let content = self.resource_json(uri).ok_or_else(|| {
                McpError::resource_not_found(format!("Unknown resource: {}", uri), None)
            })?;

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(content, uri.clone())],
            })
        }
    }
}
