//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` for consistent
//! error handling across the Doubao MCP servers.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration (fatal at startup)
//! - `Error::Validation`: Tool input validation failures (never retried)
//! - `Error::Fetch`: Image download failures, surfaced after retries are exhausted
//! - `Error::Io`: Local file system operations (never retried)
//! - `Error::UnknownTool`: A tool call named a tool the server does not expose
//! - `Error::Collaborator`: The generation API failed or returned an unusable payload

use thiserror::Error;

/// Unified error type for the common library.
///
/// Every failure a tool call can hit maps onto one variant, and each variant
/// has a stable [`category`](Error::category) string reported back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Image download errors after the retry budget is spent
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The requested tool does not exist
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Generation API errors with endpoint and HTTP status context.
    ///
    /// A status code of 0 means the request never produced an HTTP response.
    #[error("Generation API error for {endpoint} (HTTP {status_code}): {message}")]
    Collaborator {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API
        status_code: u16,
        /// Error message from the API or describing the failure
        message: String,
    },
}

impl Error {
    /// Create a new generation API error with endpoint, status code, and message.
    ///
    /// # Example
    ///
    /// ```
    /// use doubao_mcp_common::error::Error;
    ///
    /// let err = Error::collaborator(
    ///     "https://ark.cn-beijing.volces.com/api/v3/images/generations",
    ///     500,
    ///     "Internal server error"
    /// );
    /// assert!(err.to_string().contains("volces.com"));
    /// assert!(err.to_string().contains("500"));
    /// ```
    pub fn collaborator(
        endpoint: impl Into<String>,
        status_code: u16,
        message: impl Into<String>,
    ) -> Self {
        Error::Collaborator {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use doubao_mcp_common::error::Error;
    ///
    /// let err = Error::validation("prompt cannot be empty");
    /// assert!(err.to_string().contains("prompt cannot be empty"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a new unknown tool error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Error::UnknownTool(name.into())
    }

    /// Stable category name reported to tool callers.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Validation(_) => "validation",
            Error::Fetch(_) => "fetch",
            Error::Io(_) => "io",
            Error::UnknownTool(_) => "unknown_tool",
            Error::Collaborator { .. } => "collaborator",
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// The cause of a single failed download attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The request never produced a response (DNS, connect, timeout, body read)
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// The payload is not a decodable image
    #[error("invalid image data: {0}")]
    Decode(String),

    /// The payload decoded to an image without pixels
    #[error("image has zero width or height")]
    EmptyImage,
}

/// Image download failure after every attempt was spent.
#[derive(Debug, Clone, Error)]
#[error("Failed to download image from {url} after {attempts} attempt(s): {cause}")]
pub struct FetchError {
    /// URL that was being downloaded
    pub url: String,
    /// Number of attempts made
    pub attempts: u32,
    /// Cause of the last failed attempt
    pub cause: FetchFailure,
}

impl FetchError {
    /// Create a new fetch error from the last attempt's failure.
    pub fn new(url: impl Into<String>, attempts: u32, cause: FetchFailure) -> Self {
        FetchError {
            url: url.into(),
            attempts,
            cause,
        }
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
