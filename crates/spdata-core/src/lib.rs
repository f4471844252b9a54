//! spdata-core — the data path of the spdata exporter.
//!
//! Turns the nested JSON reported by `system_profiler -json` into flat
//! records, renders each record as a comma-separated text line, and routes
//! those lines into gauge observations.
//!
//! # Pipeline
//!
//! ```text
//! raw JSON text
//!   └── flatten_output() → Vec<FlatRecord>
//!         └── FlatRecord::to_line() → "SPCameraDataType, 0, _name, FaceTime HD"
//!               └── route_line() → Observation { metric, device, name, value }
//! ```

pub mod config;
pub mod error;
pub mod flatten;
pub mod record;
pub mod route;

pub use config::{ExporterConfig, ProbeConfig};
pub use error::{ConfigError, FlattenError, RouteError};
pub use flatten::{flatten, flatten_output};
pub use record::{FlatRecord, LeafValue};
pub use route::{metric_name, route_line, Observation, SampleValue, METRIC_PREFIX};
