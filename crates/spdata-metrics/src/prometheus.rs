//! Prometheus text exposition format.
//!
//! Renders registry snapshots into the Prometheus text exposition format
//! for scraping by a Prometheus server or compatible agent.

use std::fmt::Write;

use crate::registry::{SeriesSnapshot, LABEL_NAMES};

/// Content type of the rendered exposition.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Exporter version, published as the `spdata_version` series.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render registry snapshots into Prometheus text format.
///
/// Always starts with the `spdata_version` build-info gauge. Series without
/// samples are omitted.
pub fn render_prometheus(snapshots: &[SeriesSnapshot]) -> String {
    let mut out = String::new();

    out.push_str(
        "# HELP spdata_version Build information for the spdata exporter, including version.\n",
    );
    out.push_str("# TYPE spdata_version gauge\n");
    let _ = writeln!(out, "spdata_version{{version=\"{}\"}} 1", escape_label(VERSION));

    for series in snapshots.iter().filter(|s| !s.samples.is_empty()) {
        let _ = writeln!(out, "# HELP {} {}", series.name, escape_help(&series.help));
        let _ = writeln!(out, "# TYPE {} gauge", series.name);
        for sample in &series.samples {
            let labels = LABEL_NAMES
                .iter()
                .zip(sample.labels.iter())
                .map(|(name, value)| format!("{name}=\"{}\"", escape_label(value)))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "{}{{{labels}}} {}", series.name, format_value(sample.value));
        }
    }

    out
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}
