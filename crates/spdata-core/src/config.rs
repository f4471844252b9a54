//! spdata-exporter.yml configuration parser.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/usr/local/etc/spdata-exporter.yml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Port for the `/metrics` listener.
    pub port: u16,
    /// `system_profiler` data types polled on every scrape.
    pub data_types: Vec<String>,
    /// Drop every series at the start of each scrape so vanished data
    /// types do not linger with stale values.
    #[serde(default = "default_reset")]
    pub reset_between_polls: bool,
    /// Upper bound on a single `system_profiler` invocation.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    #[serde(default)]
    pub probes: ProbeConfig,
}

/// Auxiliary host probes. All disabled unless switched on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub cvlabel: bool,
    #[serde(default)]
    pub latest_backup: bool,
    #[serde(default)]
    pub core_files: bool,
    #[serde(default = "default_cores_dir")]
    pub cores_dir: PathBuf,
    #[serde(default)]
    pub ntp: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            cvlabel: false,
            latest_backup: false,
            core_files: false,
            cores_dir: default_cores_dir(),
            ntp: false,
        }
    }
}

fn default_reset() -> bool {
    true
}

fn default_cores_dir() -> PathBuf {
    PathBuf::from("/cores")
}

impl ExporterConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero".to_string()));
        }
        if let Some(i) = self.data_types.iter().position(|d| d.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("data_types[{i}] is empty")));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_minimal() {
        let yaml = "port: 9100\ndata_types:\n  - SPCameraDataType\n";
        let config = ExporterConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.data_types, vec!["SPCameraDataType"]);
        assert!(config.reset_between_polls);
        assert_eq!(config.fetch_timeout(), None);
        assert_eq!(config.probes, ProbeConfig::default());
        assert_eq!(config.probes.cores_dir, PathBuf::from("/cores"));
    }

    #[test]
    fn parse_full() {
        let yaml = r#"
port: 9200
data_types: [SPStorageDataType, SPPowerDataType]
reset_between_polls: false
fetch_timeout_secs: 15
probes:
  cvlabel: true
  core_files: true
  cores_dir: /tmp/cores
"#;
        let config = ExporterConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.data_types.len(), 2);
        assert!(!config.reset_between_polls);
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(15)));
        assert!(config.probes.cvlabel);
        assert!(config.probes.core_files);
        assert!(!config.probes.latest_backup);
        assert!(!config.probes.ntp);
        assert_eq!(config.probes.cores_dir, PathBuf::from("/tmp/cores"));
    }

    #[test]
    fn missing_port_is_parse_error() {
        let err = ExporterConfig::from_yaml_str("data_types: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_port_rejected() {
        let err = ExporterConfig::from_yaml_str("port: 0\ndata_types: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn blank_data_type_rejected() {
        let err = ExporterConfig::from_yaml_str("port: 9100\ndata_types: [\"  \"]\n").unwrap_err();
        assert!(err.to_string().contains("data_types[0]"));
    }

    #[test]
    fn from_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 9100").unwrap();
        writeln!(file, "data_types: [SPCameraDataType]").unwrap();

        let config = ExporterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9100);
    }

    #[test]
    fn from_file_missing() {
        let err = ExporterConfig::from_file(Path::new("/nonexistent/spdata.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
