//! Routing of flat text lines into gauge observations.
//!
//! A line `Type, device, seg…, value` maps to the series
//! `spdata_type{device, name, value}`:
//!
//! | Field | Label |
//! |---|---|
//! | first | series name, lowercased and prefixed with `spdata_` |
//! | second | `device` |
//! | all but the first two and the last | `name`, joined with `-` |
//! | last | `value` |
//!
//! `-` is normalized to `_` in every field, the value included, so the `-`
//! joining the name segments is unambiguous. A negative number therefore
//! routes as text (`-61` becomes the label `_61` with sample `1`), matching
//! the series names and labels existing dashboards were built against.
//!
//! The series name additionally maps anything outside `[a-z0-9_:]` to `_`.

use crate::error::RouteError;
use crate::record::FIELD_SEPARATOR;

/// Prefix shared by every dynamically created series.
pub const METRIC_PREFIX: &str = "spdata_";

const MIN_FIELDS: usize = 4;

/// The numeric side of a sample.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    /// A leaf that parsed as a number: the sample is the number itself.
    Numeric(f64),
    /// Anything else: the text rides in the `value` label and the sample
    /// is a presence flag of `1`.
    Text(String),
}

impl SampleValue {
    /// Classify a raw leaf.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(v) => SampleValue::Numeric(v),
            Err(_) => SampleValue::Text(raw.to_string()),
        }
    }

    /// Text for the `value` label. Numbers are truncated to an integer.
    pub fn label(&self) -> String {
        match self {
            SampleValue::Numeric(v) => (*v as i64).to_string(),
            SampleValue::Text(s) => s.clone(),
        }
    }

    pub fn sample(&self) -> f64 {
        match self {
            SampleValue::Numeric(v) => *v,
            SampleValue::Text(_) => 1.0,
        }
    }
}

/// One sample bound for the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub metric: String,
    pub device: String,
    pub name: String,
    pub value: SampleValue,
}

impl Observation {
    /// Label values in schema order: `device`, `name`, `value`.
    pub fn label_values(&self) -> [String; 3] {
        [self.device.clone(), self.name.clone(), self.value.label()]
    }
}

/// Series name for a data type: `spdata_` + lowercase, with every character
/// that is not valid in a Prometheus metric name replaced by `_`.
pub fn metric_name(data_type: &str) -> String {
    let suffix: String = data_type
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | ':' => c,
            _ => '_',
        })
        .collect();
    format!("{METRIC_PREFIX}{suffix}")
}

/// Route one text line produced by [`crate::FlatRecord::to_line`].
///
/// Lines with fewer than four fields carry no device or name and are
/// rejected; the caller is expected to log and skip them.
pub fn route_line(line: &str) -> Result<Observation, RouteError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < MIN_FIELDS {
        return Err(RouteError::TooFewFields {
            fields: fields.len(),
            line: line.to_string(),
        });
    }

    let last = fields.len() - 1;
    let name = fields[2..last]
        .iter()
        .map(|segment| normalize(segment))
        .collect::<Vec<_>>()
        .join("-");

    Ok(Observation {
        metric: metric_name(fields[0]),
        device: normalize(fields[1]),
        name,
        value: SampleValue::parse(&normalize(fields[last])),
    })
}

fn normalize(field: &str) -> String {
    field.replace('-', "_")
}
