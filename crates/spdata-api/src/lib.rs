//! spdata-api — HTTP surface of the spdata exporter.
//!
//! Every `GET /metrics` runs one full scrape cycle: reset the registry,
//! fetch each configured data type, flatten, route, run the host probes,
//! and render the registry in Prometheus text format.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Scrape and return Prometheus exposition |
//! | GET | `/healthz` | Liveness, no scrape |

pub mod error;
pub mod handlers;
pub mod scrape;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use spdata_metrics::MetricsRegistry;
use spdata_source::DataSource;

pub use error::ScrapeError;
pub use scrape::{scrape, ScrapeSettings};

/// Shared state for the scrape handler.
#[derive(Clone)]
pub struct ScrapeContext {
    pub registry: MetricsRegistry,
    pub source: Arc<dyn DataSource>,
    pub settings: Arc<ScrapeSettings>,
}

impl ScrapeContext {
    pub fn new(registry: MetricsRegistry, source: Arc<dyn DataSource>, settings: ScrapeSettings) -> Self {
        Self {
            registry,
            source,
            settings: Arc::new(settings),
        }
    }
}

/// Build the exporter router.
pub fn build_router(ctx: ScrapeContext) -> Router {
    Router::new()
        .route("/metrics", get(handlers::metrics))
        .route("/healthz", get(handlers::healthz))
        .with_state(ctx)
}
