//! spdata-exporter — serves `system_profiler` data as Prometheus metrics.
//!
//! Single binary that assembles the exporter:
//! - YAML config (port, data types, probes)
//! - Data source (`system_profiler`, or JSON fixtures)
//! - Dynamic gauge registry
//! - `/metrics` scrape endpoint
//!
//! # Usage
//!
//! ```text
//! spdata-exporter --config /usr/local/etc/spdata-exporter.yml
//! spdata-exporter --config ./dev.yml --fixture-dir ./fixtures
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use spdata_api::{ScrapeContext, ScrapeSettings};
use spdata_core::config::DEFAULT_CONFIG_PATH;
use spdata_core::ExporterConfig;
use spdata_metrics::MetricsRegistry;
use spdata_source::{DataSource, StaticSource, SystemProfiler};

#[derive(Parser)]
#[command(name = "spdata-exporter", version, about = "system_profiler Prometheus exporter")]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Serve `<DataType>.json` files from this directory instead of
    /// running system_profiler.
    #[arg(long)]
    fixture_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,spdata=debug")),
        )
        .init();

    let cli = Cli::parse();

    let config = ExporterConfig::from_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    info!(
        path = %cli.config.display(),
        port = config.port,
        data_types = config.data_types.len(),
        "config loaded"
    );

    let source: Arc<dyn DataSource> = match &cli.fixture_dir {
        Some(dir) => {
            let fixtures = StaticSource::from_dir(dir)
                .with_context(|| format!("loading fixtures from {}", dir.display()))?;
            info!(dir = %dir.display(), fixtures = fixtures.len(), "serving fixtures");
            Arc::new(fixtures)
        }
        None => Arc::new(SystemProfiler::new()),
    };

    run(config, source).await
}

async fn run(config: ExporterConfig, source: Arc<dyn DataSource>) -> anyhow::Result<()> {
    let ctx = ScrapeContext::new(MetricsRegistry::new(), source, ScrapeSettings::from(&config));
    let router = spdata_api::build_router(ctx);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "starting server");

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => {
                    warn!(error = %e, "failed to install Ctrl-C handler");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    info!("spdata exporter stopped");
    Ok(())
}
