//! Image generation handler for the Doubao image server.
//!
//! One call runs the whole pipeline: validate, generate, download, save.
//! Nothing is written to disk unless every earlier step succeeded.

use crate::client::{ArkClient, GenerationRequest, GenerationResult, ImageGenerator};
use crate::fetch::{ImageFetcher, RetryPolicy};
use crate::params::{describe_errors, GenerateImageParams, MAX_SEED};
use crate::storage::{derive_filename, ImageStore, SavedImage};
use chrono::Local;
use doubao_mcp_common::config::Config;
use doubao_mcp_common::error::Error;
use rand::Rng;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Image generation handler.
///
/// Holds only immutable configuration and shareable clients, so one instance
/// serves concurrent tool calls.
pub struct ImageHandler {
    /// Application configuration
    pub config: Config,
    generator: Arc<dyn ImageGenerator>,
    fetcher: ImageFetcher,
    store: ImageStore,
}

impl ImageHandler {
    /// Create a handler talking to the Ark API described by `config`.
    #[instrument(level = "debug", name = "image_handler_new", skip_all)]
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let generator = Arc::new(ArkClient::new(&config, http.clone()));
        let fetcher = ImageFetcher::new(http, RetryPolicy::default());
        let store = ImageStore::new(config.save_dir.clone());
        Self::with_deps(config, generator, fetcher, store)
    }

    /// Create a handler with explicit collaborators.
    pub fn with_deps(
        config: Config,
        generator: Arc<dyn ImageGenerator>,
        fetcher: ImageFetcher,
        store: ImageStore,
    ) -> Self {
        Self {
            config,
            generator,
            fetcher,
            store,
        }
    }

    /// Generate an image from a text prompt and save it locally.
    ///
    /// # Errors
    /// - `Error::Validation` if any parameter is invalid; nothing is sent
    /// - `Error::Collaborator` if the generation API fails
    /// - `Error::Fetch` if the image cannot be downloaded within the retry budget
    /// - `Error::Io` if the image cannot be written
    #[instrument(level = "info", name = "generate_image", skip(self, params), fields(size = %params.size, seed = params.seed))]
    pub async fn generate_image(&self, params: GenerateImageParams) -> Result<GenerationOutcome, Error> {
        params
            .validate()
            .map_err(|errors| Error::validation(describe_errors(&errors)))?;

        let seed = if params.wants_random_seed() {
            rand::thread_rng().gen_range(0..=MAX_SEED)
        } else {
            params.seed
        };

        let request = GenerationRequest {
            model: self.config.model_id.clone(),
            prompt: params.prompt.trim().to_string(),
            size: params.size.clone(),
            seed: Some(seed),
            guidance_scale: params.guidance_scale,
            watermark: params.watermark,
        };

        debug!(seed, model = %request.model, "Requesting generation");
        let generation = self.generator.generate(&request).await?;

        let image = self.fetcher.fetch(&generation.url).await?;

        let filename = derive_filename(params.file_prefix.as_deref(), Local::now());
        let saved = self.store.save(&image.bytes, &filename).await?;

        info!(path = %saved.path.display(), width = image.width, height = image.height, "Image generated");

        Ok(GenerationOutcome {
            saved,
            width: image.width,
            height: image.height,
            generation,
        })
    }
}

/// Result of a completed generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    /// Where the image was written
    #[serde(flatten)]
    pub saved: SavedImage,
    /// Decoded width in pixels
    pub width: u32,
    /// Decoded height in pixels
    pub height: u32,
    /// What the API reported
    #[serde(flatten)]
    pub generation: GenerationResult,
}

impl GenerationOutcome {
    /// Human-readable report for the tool caller.
    pub fn summary(&self) -> String {
        let g = &self.generation;
        let mut text = String::from("Image generated successfully!\n\n");
        let _ = writeln!(text, "Save path: {}", self.saved.path.display());
        let _ = writeln!(text, "Resolution: {}x{}", self.width, self.height);
        let _ = writeln!(text, "Prompt: {}", g.prompt);
        if let Some(revised) = &g.revised_prompt {
            let _ = writeln!(text, "Revised prompt: {}", revised);
        }
        match g.seed {
            Some(seed) => {
                let _ = writeln!(text, "Seed: {}", seed);
            }
            None => text.push_str("Seed: random\n"),
        }
        text.push_str("\nGeneration info:\n");
        let _ = writeln!(text, "- Model: {}", g.model);
        let _ = writeln!(text, "- Created: {}", g.created);
        let _ = writeln!(text, "- Size: {}", g.size);
        let _ = writeln!(text, "- Guidance scale: {}", g.guidance_scale);
        let _ = writeln!(text, "- Watermark: {}", g.watermark);
        let _ = writeln!(text, "- File size: {} bytes", self.saved.size_bytes);
        let _ = write!(text, "- Original URL: {}", g.url);
        text
    }
}
