//! In-memory data source backed by fixed JSON documents.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::DataSource;

/// Serves canned `system_profiler -json` output per data type.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    outputs: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the output for a data type.
    pub fn with(mut self, data_type: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(data_type.into(), output.into());
        self
    }

    /// Load every `<DataType>.json` file in `dir`.
    pub fn from_dir(dir: &Path) -> SourceResult<Self> {
        let mut source = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(data_type) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let output = std::fs::read_to_string(&path)?;
            debug!(%data_type, path = %path.display(), "loaded fixture");
            source.outputs.insert(data_type.to_string(), output);
        }
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl DataSource for StaticSource {
    fn fetch(&self, data_type: &str) -> SourceResult<String> {
        self.outputs
            .get(data_type)
            .cloned()
            .ok_or_else(|| SourceError::Missing(data_type.to_string()))
    }
}
