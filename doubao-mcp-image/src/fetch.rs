//! Download of generated images with bounded retry.
//!
//! A payload only counts as downloaded once it decodes to an image with
//! pixels. Network errors, non-success statuses and corrupt payloads are all
//! retried with a doubling delay.

use doubao_mcp_common::error::{FetchError, FetchFailure};
use image::ImageFormat;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry::Retry;
use tracing::{debug, info, instrument, warn};

/// Retry budget for a single download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each one after
    pub initial_delay: Duration,
    /// Upper bound on one attempt, body included
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// The sleeps taken between attempts, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        std::iter::successors(Some(self.initial_delay), |d| d.checked_mul(2))
            .take(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// A downloaded image that passed the integrity check.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    /// Raw payload as served
    pub bytes: Vec<u8>,
    /// Format detected from the payload
    pub format: ImageFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Downloads image URLs according to a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    http: reqwest::Client,
    policy: RetryPolicy,
}

impl ImageFetcher {
    /// Create a fetcher sharing the given HTTP client.
    pub fn new(http: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { http, policy }
    }

    /// The retry policy in use.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Download `url`, retrying until it yields a valid image or the budget runs out.
    #[instrument(level = "info", name = "fetch_image", skip(self), fields(max_attempts = self.policy.max_attempts))]
    pub async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let attempts = AtomicU32::new(0);

        let result = Retry::spawn(self.policy.delays(), || {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            async move {
                self.attempt(url).await.inspect_err(|cause| {
                    warn!(attempt, max_attempts = self.policy.max_attempts, %cause, "Image download attempt failed");
                })
            }
        })
        .await;

        let attempts = attempts.load(Ordering::Relaxed);
        match result {
            Ok(image) => {
                info!(
                    attempts,
                    bytes = image.bytes.len(),
                    width = image.width,
                    height = image.height,
                    "Image downloaded"
                );
                Ok(image)
            }
            Err(cause) => Err(FetchError::new(url, attempts, cause)),
        }
    }

    async fn attempt(&self, url: &str) -> Result<FetchedImage, FetchFailure> {
        debug!(url, "Downloading image");

        let response = self
            .http
            .get(url)
            .timeout(self.policy.attempt_timeout)
            .send()
            .await
            .map_err(|e| FetchFailure::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchFailure::Network(e.to_string()))?
            .to_vec();

        // Full decode is CPU-bound
        tokio::task::spawn_blocking(move || {
            let (format, width, height) = inspect_image(&bytes)?;
            Ok(FetchedImage { bytes, format, width, height })
        })
        .await
        .map_err(|e| FetchFailure::Decode(e.to_string()))?
    }
}

/// Check that `bytes` is a complete, non-empty image.
///
/// Returns the detected format and the pixel dimensions.
pub fn inspect_image(bytes: &[u8]) -> Result<(ImageFormat, u32, u32), FetchFailure> {
    if bytes.is_empty() {
        return Err(FetchFailure::Decode("empty payload".to_string()));
    }
    let format = image::guess_format(bytes).map_err(|e| FetchFailure::Decode(e.to_string()))?;
    let decoded =
        image::load_from_memory_with_format(bytes, format).map_err(|e| FetchFailure::Decode(e.to_string()))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(FetchFailure::EmptyImage);
    }
    Ok((format, decoded.width(), decoded.height()))
}
