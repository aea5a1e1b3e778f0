//! Configuration errors

use crate::provider::Provider;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, patching or staging a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The bundled profile for a provider is missing
    #[error("Missing bundled config for {provider}: {}", path.display())]
    NotFound { provider: Provider, path: PathBuf },

    /// The bundled profile exists but could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bundled profile is not valid YAML
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A field has the wrong YAML type for the operation
    #[error("Config field '{field}' must be a {expected}")]
    InvalidShape {
        field: String,
        expected: &'static str,
    },

    /// A trace port override was requested but no live trace interceptor exists
    #[error("Live Trace interceptor not found in config; cannot override trace port.")]
    TraceInterceptorNotFound,

    /// The patched document could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The temporary directory or file could not be written
    #[error("Failed to stage config in temporary directory: {0}")]
    Stage(#[from] std::io::Error),
}
