//! Dynamic gauge registry.
//!
//! Maps a series name to a live [`GaugeSeries`]. Creation goes through a
//! single insert-if-absent under the write lock, so two scrapes racing to
//! create the same series always end up holding the same `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use spdata_core::Observation;

/// Label names shared by every dynamically created series.
pub const LABEL_NAMES: [&str; 3] = ["device", "name", "value"];

/// Label values in [`LABEL_NAMES`] order.
pub type LabelValues = [String; 3];

/// One labelled sample of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub labels: LabelValues,
    pub value: f64,
}

/// Point-in-time copy of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot {
    pub name: String,
    pub help: String,
    /// Sorted by label values.
    pub samples: Vec<Sample>,
}

/// A gauge with the fixed `device`/`name`/`value` label schema.
#[derive(Debug)]
pub struct GaugeSeries {
    name: String,
    help: String,
    samples: RwLock<HashMap<LabelValues, f64>>,
}

impl GaugeSeries {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            help: format!("Metric {name} dynamically created"),
            samples: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Upsert the sample for a label tuple. Last writer wins.
    pub async fn set(&self, labels: LabelValues, value: f64) {
        self.samples.write().await.insert(labels, value);
    }

    pub async fn get(&self, labels: &LabelValues) -> Option<f64> {
        self.samples.read().await.get(labels).copied()
    }

    pub async fn len(&self) -> usize {
        self.samples.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.samples.read().await.is_empty()
    }

    async fn clear(&self) {
        self.samples.write().await.clear();
    }

    /// Copy out the current samples. Atomic for this series only.
    pub async fn snapshot(&self) -> SeriesSnapshot {
        let samples = self.samples.read().await;
        let mut out: Vec<Sample> = samples
            .iter()
            .map(|(labels, value)| Sample {
                labels: labels.clone(),
                value: *value,
            })
            .collect();
        drop(samples);
        out.sort_by(|a, b| a.labels.cmp(&b.labels));

        SeriesSnapshot {
            name: self.name.clone(),
            help: self.help.clone(),
            samples: out,
        }
    }
}

/// Owner of every published series.
///
/// Cheap to clone; clones share the same series map.
///
/// # Ordering
///
/// `get_or_create`, `set`, `reset_all` and `snapshot` are individually
/// race-free. A scrape that needs reset, update and read to appear as one
/// step holds [`MetricsRegistry::begin_cycle`] for the whole sequence;
/// every scrape doing so is then fully ordered against every other.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    series: Arc<RwLock<HashMap<String, Arc<GaugeSeries>>>>,
    cycle: Arc<Mutex<()>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a scrape cycle against all other cycles.
    pub async fn begin_cycle(&self) -> OwnedMutexGuard<()> {
        self.cycle.clone().lock_owned().await
    }

    /// Return the series published under `name`, creating it if absent.
    pub async fn get_or_create(&self, name: &str) -> Arc<GaugeSeries> {
        if let Some(series) = self.series.read().await.get(name) {
            return series.clone();
        }

        let mut series = self.series.write().await;
        series
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(series = %name, "created gauge series");
                Arc::new(GaugeSeries::new(name))
            })
            .clone()
    }

    /// Look up a series without creating it.
    pub async fn get(&self, name: &str) -> Option<Arc<GaugeSeries>> {
        self.series.read().await.get(name).cloned()
    }

    /// Store one routed observation.
    pub async fn record(&self, observation: &Observation) {
        let series = self.get_or_create(&observation.metric).await;
        series
            .set(observation.label_values(), observation.value.sample())
            .await;
    }

    /// Unpublish every series and clear its samples.
    ///
    /// Series are recreated empty on their next `get_or_create`. Handles
    /// obtained before the reset keep working but are no longer visible
    /// to `snapshot`.
    pub async fn reset_all(&self) {
        let drained: Vec<Arc<GaugeSeries>> = {
            let mut series = self.series.write().await;
            series.drain().map(|(_, s)| s).collect()
        };
        for s in &drained {
            s.clear().await;
        }
        debug!(series = drained.len(), "registry reset");
    }

    /// Snapshot every published series, sorted by name.
    pub async fn snapshot(&self) -> Vec<SeriesSnapshot> {
        let published: Vec<Arc<GaugeSeries>> =
            self.series.read().await.values().cloned().collect();

        let mut snapshots = Vec::with_capacity(published.len());
        for s in published {
            snapshots.push(s.snapshot().await);
        }
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }

    /// Number of published series.
    pub async fn series_count(&self) -> usize {
        self.series.read().await.len()
    }

    /// Total samples across published series.
    pub async fn sample_count(&self) -> usize {
        let published: Vec<Arc<GaugeSeries>> =
            self.series.read().await.values().cloned().collect();
        let mut total = 0;
        for s in published {
            total += s.len().await;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdata_core::route_line;

    fn labels(device: &str, name: &str, value: &str) -> LabelValues {
        [device.to_string(), name.to_string(), value.to_string()]
    }

    #[tokio::test]
    async fn get_or_create_reuses_series() {
        let registry = MetricsRegistry::new();
        let a = registry.get_or_create("spdata_x").await;
        let b = registry.get_or_create("spdata_x").await;

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.series_count().await, 1);
        assert_eq!(a.help(), "Metric spdata_x dynamically created");
    }

    #[tokio::test]
    async fn concurrent_creation_yields_one_series() {
        let registry = MetricsRegistry::new();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move { registry.get_or_create("x").await }));
        }

        let mut series = Vec::new();
        for h in handles {
            series.push(h.await.unwrap());
        }

        let first = &series[0];
        assert!(series.iter().all(|s| Arc::ptr_eq(s, first)));
        assert_eq!(registry.series_count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creation_multi_thread() {
        let registry = MetricsRegistry::new();
        let barrier = Arc::new(tokio::sync::Barrier::new(50));

        let mut handles = Vec::new();
        for _ in 0..50 {
            let registry = registry.clone();
            let barrier = barrier.clone();
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                registry.get_or_create("x").await
            }));
        }

        let mut series = Vec::new();
        for h in handles {
            series.push(h.await.unwrap());
        }
        assert!(series.iter().all(|s| Arc::ptr_eq(s, &series[0])));
    }

    #[tokio::test]
    async fn set_is_last_writer_wins() {
        let registry = MetricsRegistry::new();
        let series = registry.get_or_create("spdata_x").await;

        series.set(labels("0", "temp", "40"), 40.0).await;
        series.set(labels("0", "temp", "40"), 40.5).await;
        series.set(labels("1", "temp", "41"), 41.0).await;

        assert_eq!(series.get(&labels("0", "temp", "40")).await, Some(40.5));
        assert_eq!(series.len().await, 2);
    }

    #[tokio::test]
    async fn record_routes_numeric_and_text() {
        let registry = MetricsRegistry::new();
        registry.record(&route_line("Type, A, B, 42").unwrap()).await;
        registry.record(&route_line("Type, A, C, hello").unwrap()).await;

        let series = registry.get("spdata_type").await.unwrap();
        assert_eq!(series.get(&labels("A", "B", "42")).await, Some(42.0));
        assert_eq!(series.get(&labels("A", "C", "hello")).await, Some(1.0));
    }

    #[tokio::test]
    async fn reset_clears_snapshot() {
        let registry = MetricsRegistry::new();
        let series = registry.get_or_create("spdata_x").await;
        series.set(labels("0", "a", "1"), 1.0).await;
        assert_eq!(registry.sample_count().await, 1);

        registry.reset_all().await;

        let snapshot = registry.snapshot().await;
        assert!(snapshot.iter().all(|s| s.samples.is_empty()));
        assert_eq!(registry.series_count().await, 0);
        assert!(series.is_empty().await);

        // Recreated on demand, as a fresh series.
        let again = registry.get_or_create("spdata_x").await;
        assert!(!Arc::ptr_eq(&series, &again));
        assert!(again.is_empty().await);
    }

    #[tokio::test]
    async fn snapshot_is_sorted() {
        let registry = MetricsRegistry::new();
        registry.get_or_create("spdata_b").await.set(labels("1", "n", "v"), 1.0).await;
        let a = registry.get_or_create("spdata_a").await;
        a.set(labels("1", "n", "v"), 1.0).await;
        a.set(labels("0", "n", "v"), 2.0).await;

        let snapshot = registry.snapshot().await;
        let names: Vec<&str> = snapshot.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["spdata_a", "spdata_b"]);
        assert_eq!(snapshot[0].samples[0].labels[0], "0");
        assert_eq!(snapshot[0].samples[0].value, 2.0);
    }

    #[tokio::test]
    async fn cycle_lock_serializes_scrapes() {
        let registry = MetricsRegistry::new();
        let guard = registry.begin_cycle().await;

        let other = registry.clone();
        let waiter = tokio::spawn(async move {
            let _guard = other.begin_cycle().await;
            other.series_count().await
        });

        registry.get_or_create("spdata_x").await;
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(guard);
        assert_eq!(waiter.await.unwrap(), 1);
    }
}
