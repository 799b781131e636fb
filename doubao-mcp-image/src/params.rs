//! Image generation parameters and their validation.
//!
//! Validation is pure: it never touches the network or the file system, and
//! it reports every failing field at once.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    /// Size identifier in `WIDTHxHEIGHT` form, as sent to the API
    pub id: &'static str,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Aspect ratio and shape
    pub label: &'static str,
}

impl ImageSize {
    /// Look up a supported size by its identifier.
    pub fn find(id: &str) -> Option<&'static ImageSize> {
        SUPPORTED_SIZES.iter().find(|s| s.id == id)
    }
}

/// Resolutions accepted by the Doubao text-to-image models.
pub const SUPPORTED_SIZES: &[ImageSize] = &[
    ImageSize { id: "512x512", width: 512, height: 512, label: "1:1 Small Square" },
    ImageSize { id: "768x768", width: 768, height: 768, label: "1:1 Square" },
    ImageSize { id: "1024x1024", width: 1024, height: 1024, label: "1:1 Large Square" },
    ImageSize { id: "864x1152", width: 864, height: 1152, label: "3:4 Portrait" },
    ImageSize { id: "1152x864", width: 1152, height: 864, label: "4:3 Landscape" },
    ImageSize { id: "1280x720", width: 1280, height: 720, label: "16:9 Widescreen" },
    ImageSize { id: "720x1280", width: 720, height: 1280, label: "9:16 Mobile Portrait" },
    ImageSize { id: "832x1248", width: 832, height: 1248, label: "2:3" },
    ImageSize { id: "1248x832", width: 1248, height: 832, label: "3:2" },
    ImageSize { id: "1512x648", width: 1512, height: 648, label: "21:9 Ultra-wide" },
    ImageSize { id: "2048x2048", width: 2048, height: 2048, label: "1:1 Extra Large Square" },
];

/// Default output size.
pub const DEFAULT_SIZE: &str = "1024x1024";

/// Seed value asking for a random seed.
pub const RANDOM_SEED: i64 = -1;

/// Largest seed the API accepts.
pub const MAX_SEED: i64 = 2_147_483_647;

/// Smallest accepted guidance scale.
pub const MIN_GUIDANCE_SCALE: f64 = 1.0;

/// Largest accepted guidance scale.
pub const MAX_GUIDANCE_SCALE: f64 = 10.0;

/// Default guidance scale.
pub const DEFAULT_GUIDANCE_SCALE: f64 = 8.0;

/// Maximum length of a filename prefix.
pub const MAX_FILE_PREFIX_LEN: usize = 20;

/// Text-to-image generation parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct GenerateImageParams {
    /// Text prompt describing the image to generate.
    pub prompt: String,

    /// Output size, one of [`SUPPORTED_SIZES`].
    #[serde(default = "default_size")]
    pub size: String,

    /// Random seed, or -1 for a random one.
    #[serde(default = "default_seed")]
    pub seed: i64,

    /// How strictly the output follows the prompt (1.0-10.0).
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,

    /// Whether the provider adds a watermark.
    #[serde(default = "default_watermark")]
    pub watermark: bool,

    /// Prefix for the saved filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_prefix: Option<String>,
}

fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

fn default_seed() -> i64 {
    RANDOM_SEED
}

fn default_guidance_scale() -> f64 {
    DEFAULT_GUIDANCE_SCALE
}

fn default_watermark() -> bool {
    true
}

impl GenerateImageParams {
    /// Parameters with the given prompt and every other field at its default.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            size: default_size(),
            seed: default_seed(),
            guidance_scale: default_guidance_scale(),
            watermark: default_watermark(),
            file_prefix: None,
        }
    }

    /// Validate every field.
    ///
    /// # Returns
    /// - `Ok(())` if all parameters are valid
    /// - `Err(Vec<ValidationError>)` with one entry per failing field
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.prompt.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyPrompt,
                "prompt",
                "Prompt cannot be empty",
            ));
        }

        if ImageSize::find(&self.size).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSize,
                "size",
                format!(
                    "Size '{}' is not supported. Valid options: {}",
                    self.size,
                    SUPPORTED_SIZES.iter().map(|s| s.id).collect::<Vec<_>>().join(", ")
                ),
            ));
        }

        if !(RANDOM_SEED..=MAX_SEED).contains(&self.seed) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSeed,
                "seed",
                format!("Seed must be between {} and {}, got {}", RANDOM_SEED, MAX_SEED, self.seed),
            ));
        }

        // NaN fails the range check
        if !(MIN_GUIDANCE_SCALE..=MAX_GUIDANCE_SCALE).contains(&self.guidance_scale) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidGuidance,
                "guidance_scale",
                format!(
                    "Guidance scale must be between {:.1} and {:.1}, got {}",
                    MIN_GUIDANCE_SCALE, MAX_GUIDANCE_SCALE, self.guidance_scale
                ),
            ));
        }

        if let Some(prefix) = &self.file_prefix {
            if let Err(message) = check_file_prefix(prefix) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPrefix,
                    "file_prefix",
                    message,
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether the caller asked for a random seed.
    pub fn wants_random_seed(&self) -> bool {
        self.seed == RANDOM_SEED
    }
}

fn check_file_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() {
        return Err("File prefix cannot be empty".to_string());
    }
    let len = prefix.chars().count();
    if len > MAX_FILE_PREFIX_LEN {
        return Err(format!(
            "File prefix must be {} characters or less, got {}",
            MAX_FILE_PREFIX_LEN, len
        ));
    }
    if !prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(format!(
            "File prefix '{}' can only contain letters, numbers, underscores and hyphens",
            prefix
        ));
    }
    Ok(())
}

/// Which rule a parameter broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    InvalidSize,
    InvalidSeed,
    InvalidGuidance,
    EmptyPrompt,
    InvalidPrefix,
}

/// Validation error details for image generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The rule that was broken.
    pub kind: ValidationErrorKind,
    /// The field that failed validation.
    pub field: &'static str,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Join validation errors into a single caller-facing message.
pub fn describe_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
