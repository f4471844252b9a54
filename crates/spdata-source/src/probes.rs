//! Auxiliary host probes.
//!
//! Each probe shells out (or walks a directory) and turns the result into
//! one or more samples with the same `device`/`name`/`value` labels as the
//! flattened series. Probes are best-effort: a failure is logged and the
//! probe reports a zero or empty sample instead.

use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use spdata_core::ProbeConfig;

use crate::command;
use crate::error::{SourceError, SourceResult};

pub const CVLABEL_METRIC: &str = "spdata_cvlabelcount";
pub const LATEST_BACKUP_METRIC: &str = "spdata_latestbackuptime";
pub const CORE_FILES_METRIC: &str = "spdata_corefilescount";
pub const NTP_METRIC: &str = "spdata_ntp";

const PROBE_DEVICE: &str = "0";
const FSM_CORE_PREFIX: &str = "core.fsm";
const SYSTEMSETUP: &str = "/usr/sbin/systemsetup";

/// A sample produced outside the JSON flattening path.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSample {
    pub metric: String,
    /// `device`, `name`, `value`.
    pub labels: [String; 3],
    pub value: f64,
}

impl ProbeSample {
    fn new(metric: &str, name: &str, label: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.to_string(),
            labels: [PROBE_DEVICE.to_string(), name.to_string(), label.into()],
            value,
        }
    }
}

/// Run every probe enabled in `config`. Blocking.
pub fn run_probes(config: &ProbeConfig) -> Vec<ProbeSample> {
    let mut samples = Vec::new();
    if config.cvlabel {
        samples.extend(cvlabel_count());
    }
    if config.latest_backup {
        samples.extend(latest_backup());
    }
    if config.core_files {
        samples.extend(core_files(&config.cores_dir));
    }
    if config.ntp {
        samples.extend(ntp_settings());
    }
    samples
}

/// Number of StorNext volume labels reported by `cvlabel -l`.
pub fn cvlabel_count() -> Vec<ProbeSample> {
    let count = command::run("sh", &["-c", "cvlabel -l | wc -l"])
        .and_then(|out| parse_count("cvlabel", &out))
        .unwrap_or_else(|e| {
            warn!(error = %e, "cvlabel probe failed");
            0
        });
    vec![ProbeSample::new(CVLABEL_METRIC, "cvlabel", count.to_string(), count as f64)]
}

/// Timestamp of the latest Time Machine backup.
pub fn latest_backup() -> Vec<ProbeSample> {
    let stamp = match command::run("tmutil", &["latestbackup", "-t"]) {
        Ok(out) => out.trim_end_matches('\n').to_string(),
        Err(e) => {
            warn!(error = %e, "latest backup probe failed");
            String::new()
        }
    };
    vec![backup_sample(&stamp)]
}

fn backup_sample(stamp: &str) -> ProbeSample {
    if stamp.is_empty() {
        ProbeSample::new(LATEST_BACKUP_METRIC, "latestbackup", "", 0.0)
    } else {
        ProbeSample::new(LATEST_BACKUP_METRIC, "latestbackup", stamp, 1.0)
    }
}

/// Total files and `core.fsm*` files under `dir`.
pub fn core_files(dir: &Path) -> Vec<ProbeSample> {
    let (total, fsm) = count_core_files(dir).unwrap_or_else(|e| {
        warn!(error = %e, dir = %dir.display(), "core files probe failed");
        (0, 0)
    });
    vec![
        ProbeSample::new(CORE_FILES_METRIC, "total", total.to_string(), total as f64),
        ProbeSample::new(CORE_FILES_METRIC, "fsm", fsm.to_string(), fsm as f64),
    ]
}

/// Walk `dir` recursively, returning `(total, fsm)` file counts.
pub fn count_core_files(dir: &Path) -> SourceResult<(u64, u64)> {
    let mut total = 0;
    let mut fsm = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }
        total += 1;
        if entry.file_name().to_string_lossy().starts_with(FSM_CORE_PREFIX) {
            fsm += 1;
        }
    }
    Ok((total, fsm))
}

/// Network time server, whether network time is on, and the time zone.
pub fn ntp_settings() -> Vec<ProbeSample> {
    [
        ("server", "-getnetworktimeserver"),
        ("enabled", "-getusingnetworktime"),
        ("timezone", "-gettimezone"),
    ]
    .into_iter()
    .map(|(name, flag)| {
        let setting = match command::run(SYSTEMSETUP, &[flag]) {
            Ok(out) => parse_setting(&out),
            Err(e) => {
                warn!(error = %e, %flag, "ntp probe failed");
                String::new()
            }
        };
        ProbeSample::new(NTP_METRIC, name, setting, 1.0)
    })
    .collect()
}

fn parse_count(program: &str, output: &str) -> SourceResult<u64> {
    output
        .trim()
        .parse()
        .map_err(|_| SourceError::UnexpectedOutput {
            program: program.to_string(),
            output: output.to_string(),
        })
}

/// Extract the value of a `Label: value` line. Anything else is empty.
fn parse_setting(output: &str) -> String {
    let parts: Vec<&str> = output.trim().split(": ").collect();
    match parts.as_slice() {
        [_, value] => value.to_string(),
        _ => String::new(),
    }
}
