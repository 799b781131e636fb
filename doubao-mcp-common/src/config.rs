//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;

/// Default Ark API base URL (Beijing region).
pub const DEFAULT_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3";

/// Default directory for saved images, relative to the working directory.
pub const DEFAULT_SAVE_DIR: &str = "images";

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Ark API key (required)
    pub api_key: String,
    /// Ark API base URL
    pub base_url: String,
    /// Image generation model or endpoint ID (required)
    pub model_id: String,
    /// Directory where generated images are written
    pub save_dir: PathBuf,
    /// HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnvVar` if DOUBAO_API_KEY or API_MODEL_ID is
    /// not set, and `ConfigError::InvalidValue` if PORT is not a valid port.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("DOUBAO_API_KEY")
            .ok_or_else(|| ConfigError::missing_env_var("DOUBAO_API_KEY"))?;

        let model_id = var("API_MODEL_ID")
            .ok_or_else(|| ConfigError::missing_env_var("API_MODEL_ID"))?;

        let base_url = var("BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let save_dir = var("IMAGE_SAVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR));

        let port = match var("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ConfigError::invalid_value("PORT", format!("'{}' is not a valid port", p)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            base_url,
            model_id,
            save_dir,
            port,
        })
    }

    /// Get the images generation endpoint URL.
    pub fn images_endpoint(&self) -> String {
        format!("{}/images/generations", self.base_url)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("save_dir", &self.save_dir)
            .field("port", &self.port)
            .finish()
    }
}
