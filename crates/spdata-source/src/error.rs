//! Data source error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching a data type or running a probe.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("unexpected output from '{program}': {output}")]
    UnexpectedOutput { program: String, output: String },

    #[error("no data for data type: {0}")]
    Missing(String),

    #[error("fetching {data_type} timed out after {limit:?}")]
    Timeout { data_type: String, limit: Duration },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;
