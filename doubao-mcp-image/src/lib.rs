//! Doubao MCP Image Server Library
//!
//! Text-to-image generation through the Volcano Engine Ark images API. A
//! generated image is downloaded, checked, and saved to a local directory.

pub mod client;
pub mod fetch;
pub mod handler;
pub mod params;
pub mod resources;
pub mod server;
pub mod storage;

pub use client::{ArkClient, GenerationRequest, GenerationResult, ImageGenerator};
pub use fetch::{FetchedImage, ImageFetcher, RetryPolicy};
pub use handler::{GenerationOutcome, ImageHandler};
pub use params::{GenerateImageParams, ImageSize, ValidationError, ValidationErrorKind, SUPPORTED_SIZES};
pub use server::{GenerateImageToolParams, ImageServer, GENERATE_IMAGE_TOOL};
pub use storage::{ImageStore, SavedImage};
