//! One scrape cycle: fetch, flatten, route, probe, render.

use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use spdata_core::{flatten_output, route_line, ExporterConfig, FlatRecord, ProbeConfig};
use spdata_metrics::render_prometheus;
use spdata_source::{run_probes, SourceError};

use crate::error::ScrapeError;
use crate::ScrapeContext;

/// What a scrape polls and how.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeSettings {
    /// Distinct data types, in configured order.
    pub data_types: Vec<String>,
    pub reset_between_polls: bool,
    pub fetch_timeout: Option<Duration>,
    pub probes: ProbeConfig,
}

impl ScrapeSettings {
    pub fn new(data_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut distinct: Vec<String> = Vec::new();
        for data_type in data_types {
            let data_type = data_type.into();
            if !distinct.contains(&data_type) {
                distinct.push(data_type);
            }
        }
        Self {
            data_types: distinct,
            reset_between_polls: true,
            fetch_timeout: None,
            probes: ProbeConfig::default(),
        }
    }
}

impl From<&ExporterConfig> for ScrapeSettings {
    fn from(config: &ExporterConfig) -> Self {
        Self {
            reset_between_polls: config.reset_between_polls,
            fetch_timeout: config.fetch_timeout(),
            probes: config.probes.clone(),
            ..Self::new(config.data_types.iter().cloned())
        }
    }
}

/// Run one scrape cycle and return the rendered exposition.
///
/// Holds the registry's cycle lock throughout, so concurrent requests never
/// observe each other's partial resets. A data type whose fetch fails is
/// skipped; output that is not a JSON object fails the whole scrape.
pub async fn scrape(ctx: &ScrapeContext) -> Result<String, ScrapeError> {
    let started = Instant::now();
    let _cycle = ctx.registry.begin_cycle().await;

    if ctx.settings.reset_between_polls {
        ctx.registry.reset_all().await;
    }

    let outputs = fetch_all(ctx).await;

    // Flatten everything before touching the registry.
    let mut records: Vec<FlatRecord> = Vec::new();
    for (data_type, output) in &outputs {
        let flattened = flatten_output(output).map_err(|source| ScrapeError::Flatten {
            data_type: data_type.clone(),
            source,
        })?;
        debug!(%data_type, records = flattened.len(), "flattened");
        records.extend(flattened);
    }

    let mut dropped = 0usize;
    for record in &records {
        match route_line(&record.to_line()) {
            Ok(observation) => ctx.registry.record(&observation).await,
            Err(e) => {
                dropped += 1;
                warn!(error = %e, "invalid record format");
            }
        }
    }

    record_probes(ctx).await;

    let snapshot = ctx.registry.snapshot().await;
    let body = render_prometheus(&snapshot);

    info!(
        data_types = outputs.len(),
        records = records.len(),
        dropped,
        series = snapshot.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scrape complete"
    );
    Ok(body)
}

/// Fetch every data type concurrently on the blocking pool.
///
/// Returns the outputs that were fetched successfully, in completion order.
async fn fetch_all(ctx: &ScrapeContext) -> Vec<(String, String)> {
    let mut tasks = JoinSet::new();

    for data_type in &ctx.settings.data_types {
        let source = ctx.source.clone();
        let data_type = data_type.clone();
        let timeout = ctx.settings.fetch_timeout;

        tasks.spawn(async move {
            let job = {
                let data_type = data_type.clone();
                tokio::task::spawn_blocking(move || source.fetch(&data_type))
            };

            let joined = match timeout {
                Some(limit) => match tokio::time::timeout(limit, job).await {
                    Ok(joined) => joined,
                    Err(_) => Ok(Err(SourceError::Timeout {
                        data_type: data_type.clone(),
                        limit,
                    })),
                },
                None => job.await,
            };

            match joined {
                Ok(Ok(output)) => Some((data_type, output)),
                Ok(Err(e)) => {
                    warn!(%data_type, error = %e, "skipping data type");
                    None
                }
                Err(e) => {
                    warn!(%data_type, error = %e, "fetch task aborted");
                    None
                }
            }
        });
    }

    let mut outputs = Vec::with_capacity(ctx.settings.data_types.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(output)) => outputs.push(output),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "fetch task aborted"),
        }
    }
    outputs
}

async fn record_probes(ctx: &ScrapeContext) {
    let probes = ctx.settings.probes.clone();
    let samples = match tokio::task::spawn_blocking(move || run_probes(&probes)).await {
        Ok(samples) => samples,
        Err(e) => {
            warn!(error = %e, "host probes aborted");
            return;
        }
    };

    for sample in samples {
        ctx.registry
            .get_or_create(&sample.metric)
            .await
            .set(sample.labels, sample.value)
            .await;
    }
}
