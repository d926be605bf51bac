//! File-based configuration
use std::{
    fs,
    path::Path,
    str::FromStr,
    time::Duration,
};

use serde::Deserialize;

use crate::config::{
    AdmissionConfig,
    ConfigError,
};

/// Configuration loaded from a JSON file. Only `sidecar_url` is required; every other field
/// falls back to the [`AdmissionConfig`] default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub sidecar_url: String,
    pub poll_timeout_ms: Option<u64>,
    pub submit_timeout_ms: Option<u64>,
    pub block_env_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub worker_threads: Option<usize>,
    pub pending_ttl_secs: Option<u64>,
    pub encode_fallback: Option<bool>,
    pub default_base_fee: Option<u64>,
}

fn enabled_by_default() -> bool {
    true
}

impl FileConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ConfigError::ReadError(format!("Failed to read {}: {e}", path.display()))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            ConfigError::ParseError(format!("Failed to parse {}: {e}", path.display()))
        })
    }
}

impl FromStr for FileConfig {
    type Err = ConfigError;

    /// Load configuration from a JSON string
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse JSON: {e}")))
    }
}

impl TryFrom<FileConfig> for AdmissionConfig {
    type Error = ConfigError;

    fn try_from(file: FileConfig) -> Result<Self, Self::Error> {
        let defaults = AdmissionConfig::new(file.sidecar_url);
        let config = Self {
            enabled: file.enabled,
            poll_timeout: file
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            submit_timeout: file
                .submit_timeout_ms
                .map_or(defaults.submit_timeout, Duration::from_millis),
            block_env_timeout: file
                .block_env_timeout_ms
                .map_or(defaults.block_env_timeout, Duration::from_millis),
            request_timeout: file
                .request_timeout_ms
                .map_or(defaults.request_timeout, Duration::from_millis),
            connect_timeout: file
                .connect_timeout_ms
                .map_or(defaults.connect_timeout, Duration::from_millis),
            worker_threads: file.worker_threads.unwrap_or(defaults.worker_threads),
            pending_ttl: file
                .pending_ttl_secs
                .map_or(defaults.pending_ttl, Duration::from_secs),
            encode_fallback: file.encode_fallback.unwrap_or(defaults.encode_fallback),
            default_base_fee: file.default_base_fee.unwrap_or(defaults.default_base_fee),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }
}
