//! Scrape error types.

use thiserror::Error;

use spdata_core::FlattenError;

/// Errors that fail a whole scrape.
///
/// Per-data-type fetch failures and malformed records are not here: they
/// are logged and skipped.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("error converting {data_type} output: {source}")]
    Flatten {
        data_type: String,
        #[source]
        source: FlattenError,
    },
}
