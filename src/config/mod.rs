/// Perimeter configuration handling for agent-inspector
///
/// This module covers the life of a provider configuration:
/// - Locating and reading the bundled YAML profiles
/// - Applying port overrides to a copy of the loaded document
/// - Staging the patched document in a private temporary directory
///
/// Only `server.port`, `interceptors[].type` and
/// `interceptors[].config.server_port` are ever touched; everything else is
/// passed through to the perimeter runtime as-is.
pub mod document;
pub mod error;
pub mod staged;
pub mod store;

pub use document::{ConfigDocument, PortOverrides, LIVE_TRACE_INTERCEPTOR};
pub use error::ConfigError;
pub use staged::StagedConfig;
pub use store::ConfigStore;
