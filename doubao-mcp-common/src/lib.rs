//! Doubao MCP Common Library
//!
//! Shared configuration, error handling, tracing, transport selection and
//! server plumbing for the Doubao MCP servers.

pub mod config;
pub mod error;
pub mod server;
pub mod tracing;
pub mod transport;


pub use config::Config;
pub use error::{ConfigError, Error, FetchError, FetchFailure, Result};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
