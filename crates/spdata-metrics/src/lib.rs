//! spdata-metrics — dynamic gauges for the spdata exporter.
//!
//! Series names and label values are only known once `system_profiler`
//! output has been flattened, so gauges are created on first use and may
//! be dropped wholesale between scrapes.
//!
//! # Architecture
//!
//! ```text
//! MetricsRegistry
//!   ├── begin_cycle() ← held by one scrape from reset to snapshot
//!   ├── reset_all() → unpublishes every series
//!   ├── get_or_create() / record() ← called per routed observation
//!   └── snapshot() → Vec<SeriesSnapshot>
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```

pub mod prometheus;
pub mod registry;

pub use prometheus::{render_prometheus, CONTENT_TYPE, VERSION};
pub use registry::{GaugeSeries, LabelValues, MetricsRegistry, Sample, SeriesSnapshot, LABEL_NAMES};
