//! `system_profiler` data source.

use tracing::debug;

use crate::command;
use crate::error::SourceResult;
use crate::DataSource;

const SYSTEM_PROFILER: &str = "system_profiler";

/// Fetches data types by running `system_profiler -json <DataType>`.
#[derive(Debug, Clone)]
pub struct SystemProfiler {
    program: String,
}

impl SystemProfiler {
    pub fn new() -> Self {
        Self::with_program(SYSTEM_PROFILER)
    }

    /// Use a different executable with the same command line contract.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for SystemProfiler {
    fn fetch(&self, data_type: &str) -> SourceResult<String> {
        let output = command::run(&self.program, &["-json", data_type])?;
        debug!(%data_type, bytes = output.len(), "system_profiler output captured");
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::SourceError;

    #[test]
    fn passes_json_flag_and_data_type() {
        // `echo` stands in for system_profiler and reflects its arguments.
        let source = SystemProfiler::with_program("echo");
        let out = source.fetch("SPCameraDataType").unwrap();
        assert_eq!(out.trim(), "-json SPCameraDataType");
    }

    #[test]
    fn missing_binary_reported() {
        let source = SystemProfiler::with_program("spdata-no-such-profiler");
        let err = source.fetch("SPCameraDataType").unwrap_err();
        assert!(matches!(err, SourceError::Spawn { .. }));
    }
}
