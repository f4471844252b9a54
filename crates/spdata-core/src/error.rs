//! Error types for the spdata data path.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the exporter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while flattening a collaborator's JSON output.
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object keyed by data type, got {0}")]
    NotAnObject(&'static str),
}

/// Errors raised while routing a text line into an observation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("expected at least 4 fields, got {fields}: {line}")]
    TooFewFields { fields: usize, line: String },
}
