//! Client for the Ark images generation API.
//!
//! The handler only depends on the [`ImageGenerator`] trait; [`ArkClient`] is
//! the production implementation.

use async_trait::async_trait;
use doubao_mcp_common::config::Config;
use doubao_mcp_common::error::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Upper bound on a single generation call.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// A normalized generation request, ready to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Model or endpoint ID
    pub model: String,
    /// Trimmed prompt
    pub prompt: String,
    /// Output size (`WIDTHxHEIGHT`)
    pub size: String,
    /// Seed sent to the API; `None` lets the provider choose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Prompt adherence
    pub guidance_scale: f64,
    /// Provider watermark
    pub watermark: bool,
}

/// Outcome of a successful generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    /// URL of the generated image
    pub url: String,
    /// Model reported by the provider
    pub model: String,
    /// Creation time reported by the provider (unix seconds)
    pub created: i64,
    /// Prompt as submitted
    pub prompt: String,
    /// Prompt as rewritten by the provider, when it says so
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
    /// Requested size
    pub size: String,
    /// Seed used, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Guidance scale used
    pub guidance_scale: f64,
    /// Whether a watermark was requested
    pub watermark: bool,
}

/// Something that turns a prompt into an image URL.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Run one generation call. Implementations do not retry.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, Error>;
}

/// Ark (Volcano Engine) images API client.
pub struct ArkClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ArkClient {
    /// Create a client for the endpoint described by `config`.
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: config.images_endpoint(),
            api_key: config.api_key.clone(),
        }
    }

    /// The full images generation URL this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageGenerator for ArkClient {
    #[instrument(level = "info", name = "ark_generate", skip_all, fields(model = %request.model, size = %request.size))]
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, Error> {
        let body = ArkImageRequest {
            request,
            response_format: "url",
        };

        debug!(endpoint = %self.endpoint, "Calling Ark images API");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(GENERATION_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::collaborator(&self.endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ArkImageResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.to_string())
                .unwrap_or(body);
            return Err(Error::collaborator(&self.endpoint, status.as_u16(), message));
        }

        let api_response: ArkImageResponse = response.json().await.map_err(|e| {
            Error::collaborator(&self.endpoint, status.as_u16(), format!("Failed to parse response: {}", e))
        })?;

        if let Some(error) = api_response.error {
            return Err(Error::collaborator(&self.endpoint, status.as_u16(), error.to_string()));
        }

        let image = api_response
            .data
            .into_iter()
            .find_map(|d| d.url.filter(|u| !u.is_empty()).map(|url| (url, d.revised_prompt)))
            .ok_or_else(|| Error::collaborator(&self.endpoint, status.as_u16(), "No image URL in API response"))?;

        info!("Received image URL from Ark");

        Ok(GenerationResult {
            url: image.0,
            model: api_response.model.unwrap_or_else(|| request.model.clone()),
            created: api_response.created.unwrap_or_else(|| chrono::Utc::now().timestamp()),
            prompt: request.prompt.clone(),
            revised_prompt: image.1,
            size: request.size.clone(),
            seed: request.seed,
            guidance_scale: request.guidance_scale,
            watermark: request.watermark,
        })
    }
}

// =============================================================================
// API Request/Response Types
// =============================================================================

/// Ark images API request body.
#[derive(Debug, Serialize)]
struct ArkImageRequest<'a> {
    #[serde(flatten)]
    request: &'a GenerationRequest,
    /// Always "url"; the image is downloaded separately
    response_format: &'static str,
}

/// Ark images API response body.
#[derive(Debug, Deserialize)]
struct ArkImageResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    data: Vec<ArkImageData>,
    #[serde(default)]
    error: Option<ArkApiError>,
}

#[derive(Debug, Deserialize)]
struct ArkImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArkApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl std::fmt::Display for ArkApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{}: {}", code, message),
            (None, Some(message)) => write!(f, "{}", message),
            (Some(code), None) => write!(f, "{}", code),
            (None, None) => write!(f, "unknown error"),
        }
    }
}
