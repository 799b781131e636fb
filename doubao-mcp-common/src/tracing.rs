//! Tracing initialization for the Doubao MCP servers.
//!
//! Filtering is controlled by `RUST_LOG`, for example:
//!
//! - `RUST_LOG=debug` - debug logging for all modules
//! - `RUST_LOG=doubao_mcp_image=debug` - debug for the image server only
//! - `RUST_LOG=warn,doubao_mcp_image::fetch=debug` - quiet except download retries
//!
//! Output goes to stderr. With the stdio transport, stdout carries the MCP
//! protocol stream and must not receive log lines.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

/// Default filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Try to install the global subscriber.
///
/// Returns `Err(())` if a subscriber was already set, which makes this safe to
/// call from tests.
///
/// ```
/// use doubao_mcp_common::tracing::try_init_tracing;
///
/// let _ = try_init_tracing();
/// tracing::info!("Server starting");
/// ```
pub fn try_init_tracing() -> Result<(), ()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_LOG_LEVEL))
        .with(fmt_layer)
        .try_init()
        .map_err(|_| ())
}

/// Install the global subscriber, ignoring a subscriber that is already set.
pub fn init_tracing() {
    if try_init_tracing().is_err() {
        tracing::debug!("Tracing subscriber already initialized");
    }
}
