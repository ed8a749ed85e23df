use thiserror::Error;

pub mod config;
pub mod credentials;

pub use config::{ReportConfig, TargetConfig};
pub use credentials::WarehouseCredentials;

/// Errors raised while loading configuration or credential files.
///
/// All variants are fatal: the pipeline never starts with a partially
/// loaded configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not match the expected shape.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The file is not valid YAML or does not match the expected shape.
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A field parsed but failed validation (empty, malformed).
    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },
}
