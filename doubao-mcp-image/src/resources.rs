//! MCP Resources for the Doubao image server.
//!
//! - `doubao://sizes` - supported output sizes
//! - `doubao://config` - effective server configuration, without credentials

use crate::params::{DEFAULT_SIZE, SUPPORTED_SIZES};
use doubao_mcp_common::config::Config;
use serde::Serialize;

/// URI of the sizes resource.
pub const SIZES_URI: &str = "doubao://sizes";

/// URI of the configuration resource.
pub const CONFIG_URI: &str = "doubao://config";

/// A supported size as published to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SizeInfo {
    /// Size identifier accepted by the tool
    pub id: &'static str,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Aspect ratio and shape
    pub label: &'static str,
    /// Whether this is the default size
    pub is_default: bool,
}

/// Configuration as published to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    /// Model or endpoint ID used for generation
    pub model_id: String,
    /// Ark API base URL
    pub base_url: String,
    /// Directory images are saved into
    pub save_dir: String,
}

/// List all supported sizes.
pub fn list_sizes() -> Vec<SizeInfo> {
    SUPPORTED_SIZES
        .iter()
        .map(|s| SizeInfo {
            id: s.id,
            width: s.width,
            height: s.height,
            label: s.label,
            is_default: s.id == DEFAULT_SIZE,
        })
        .collect()
}

/// Describe `config` without its API key.
pub fn config_info(config: &Config) -> ConfigInfo {
    ConfigInfo {
        model_id: config.model_id.clone(),
        base_url: config.base_url.clone(),
        save_dir: config.save_dir.display().to_string(),
    }
}

/// Get sizes resource as JSON string.
pub fn sizes_resource_json() -> String {
    serde_json::to_string_pretty(&list_sizes()).unwrap_or_else(|_| "[]".to_string())
}

/// Get configuration resource as JSON string.
pub fn config_resource_json(config: &Config) -> String {
    serde_json::to_string_pretty(&config_info(config)).unwrap_or_else(|_| "{}".to_string())
}
