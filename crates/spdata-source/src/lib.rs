//! spdata-source — where the exporter's raw data comes from.
//!
//! [`DataSource`] is the seam between the scrape pipeline and the host:
//! production uses [`SystemProfiler`], tests and offline runs use
//! [`StaticSource`]. Auxiliary host probes live in [`probes`] and feed
//! samples that bypass the JSON path entirely.

pub mod command;
pub mod error;
pub mod fixture;
pub mod probes;
pub mod profiler;

pub use error::SourceError;
pub use fixture::StaticSource;
pub use probes::{run_probes, ProbeSample};
pub use profiler::SystemProfiler;

/// Capability to fetch the raw JSON reported for one data type.
///
/// Implementations may block; callers run them on a blocking thread.
pub trait DataSource: Send + Sync {
    fn fetch(&self, data_type: &str) -> Result<String, SourceError>;
}
