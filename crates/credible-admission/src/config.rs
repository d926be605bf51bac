use std::time::Duration;

use sidecar_client::SidecarClientConfig;
use sidecar_model::{
    BlockEnvDefaults,
    DEFAULT_BASE_FEE,
};
use url::Url;

pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(1000);
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_BLOCK_ENV_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_PENDING_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    ReadError(String),
    #[error("{0}")]
    ParseError(String),
    #[error("sidecar URL is required when the credible layer is enabled")]
    MissingUrl,
    #[error("invalid sidecar URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
    #[error("pending_ttl ({ttl:?}) must be longer than poll_timeout ({poll_timeout:?})")]
    PendingTtlTooShort {
        ttl: Duration,
        poll_timeout: Duration,
    },
}

/// Everything the credible layer needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionConfig {
    pub enabled: bool,
    pub sidecar_url: String,
    /// How long post-processing waits for a validation result before including the transaction.
    pub poll_timeout: Duration,
    /// Bound on the synchronous `sendTransactions` call made during pre-processing.
    pub submit_timeout: Duration,
    /// Bound on the synchronous `sendBlockEnv` call made for every new block.
    pub block_env_timeout: Duration,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub worker_threads: usize,
    /// Pending entries older than this are dropped on the next sweep.
    pub pending_ttl: Duration,
    /// Submit a minimal environment instead of skipping transactions that fail to encode.
    pub encode_fallback: bool,
    pub default_base_fee: u64,
}

impl AdmissionConfig {
    pub fn new(sidecar_url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            sidecar_url: sidecar_url.into(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            block_env_timeout: DEFAULT_BLOCK_ENV_TIMEOUT,
            request_timeout: sidecar_client::DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: sidecar_client::DEFAULT_CONNECT_TIMEOUT,
            worker_threads: sidecar_client::DEFAULT_WORKER_THREADS,
            pending_ttl: DEFAULT_PENDING_TTL,
            encode_fallback: false,
            default_base_fee: DEFAULT_BASE_FEE,
        }
    }

    /// A configuration that turns every hook into a no-op.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(String::new())
        }
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn with_block_env_timeout(mut self, timeout: Duration) -> Self {
        self.block_env_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_pending_ttl(mut self, ttl: Duration) -> Self {
        self.pending_ttl = ttl;
        self
    }

    pub fn with_encode_fallback(mut self, encode_fallback: bool) -> Self {
        self.encode_fallback = encode_fallback;
        self
    }

    /// Checks the URL, that no bound is zero and that pending entries outlive the poll wait.
    /// A disabled configuration is always valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        self.parsed_url()?;

        let bounds = [
            ("poll_timeout", self.poll_timeout.is_zero()),
            ("submit_timeout", self.submit_timeout.is_zero()),
            ("block_env_timeout", self.block_env_timeout.is_zero()),
            ("request_timeout", self.request_timeout.is_zero()),
            ("connect_timeout", self.connect_timeout.is_zero()),
            ("pending_ttl", self.pending_ttl.is_zero()),
            ("worker_threads", self.worker_threads == 0),
        ];
        if let Some((name, _)) = bounds.into_iter().find(|(_, zero)| *zero) {
            return Err(ConfigError::ZeroValue(name));
        }
        if self.pending_ttl <= self.poll_timeout {
            return Err(ConfigError::PendingTtlTooShort {
                ttl: self.pending_ttl,
                poll_timeout: self.poll_timeout,
            });
        }
        Ok(())
    }

    fn parsed_url(&self) -> Result<Url, ConfigError> {
        if self.sidecar_url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        let invalid = |reason: String| {
            ConfigError::InvalidUrl {
                url: self.sidecar_url.clone(),
                reason,
            }
        };
        let url = Url::parse(&self.sidecar_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("scheme {other} is not http or https"))),
        }
    }

    pub fn client_config(&self) -> Result<SidecarClientConfig, ConfigError> {
        Ok(SidecarClientConfig::new(self.parsed_url()?)
            .with_request_timeout(self.request_timeout)
            .with_connect_timeout(self.connect_timeout)
            .with_worker_threads(self.worker_threads))
    }

    pub fn block_env_defaults(&self) -> BlockEnvDefaults {
        BlockEnvDefaults {
            base_fee: self.default_base_fee,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = AdmissionConfig::new("http://localhost:9547");
        assert!(config.enabled);
        assert_eq!(config.poll_timeout, Duration::from_millis(1000));
        assert_eq!(config.submit_timeout, Duration::from_millis(500));
        assert_eq!(config.block_env_timeout, Duration::from_millis(500));
        assert_eq!(config.default_base_fee, 1);
        assert!(!config.encode_fallback);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("", ConfigError::MissingUrl)]
    #[case("   ", ConfigError::MissingUrl)]
    fn test_missing_url(#[case] url: &str, #[case] expected: ConfigError) {
        assert_eq!(AdmissionConfig::new(url).validate(), Err(expected));
    }

    #[rstest]
    #[case("localhost:9547")]
    #[case("ftp://localhost:9547")]
    #[case("ws://localhost:9547")]
    fn test_rejects_non_http_urls(#[case] url: &str) {
        assert_matches!(
            AdmissionConfig::new(url).validate(),
            Err(ConfigError::InvalidUrl { .. })
        );
    }

    #[test]
    fn test_rejects_zero_bounds() {
        let config = AdmissionConfig::new("http://localhost:9547").with_poll_timeout(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroValue("poll_timeout")));

        let config = AdmissionConfig::new("https://sidecar").with_pending_ttl(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroValue("pending_ttl")));
    }

    #[rstest]
    #[case(Duration::from_millis(500))]
    #[case(Duration::from_millis(1000))]
    fn test_rejects_ttl_not_longer_than_poll_timeout(#[case] ttl: Duration) {
        let config = AdmissionConfig::new("http://localhost:9547")
            .with_poll_timeout(Duration::from_millis(1000))
            .with_pending_ttl(ttl);
        assert_eq!(
            config.validate(),
            Err(ConfigError::PendingTtlTooShort {
                ttl,
                poll_timeout: Duration::from_millis(1000),
            })
        );

        let config = config.with_pending_ttl(Duration::from_millis(1001));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_block_env_timeout() {
        let config = AdmissionConfig::new("http://localhost:9547")
            .with_block_env_timeout(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroValue("block_env_timeout")));
    }

    #[test]
    fn test_disabled_skips_validation() {
        assert!(AdmissionConfig::disabled().validate().is_ok());
    }

    #[test]
    fn test_client_config_carries_timeouts() {
        let config = AdmissionConfig::new("http://localhost:9547")
            .with_request_timeout(Duration::from_secs(3));
        let client = config.client_config().unwrap();
        assert_eq!(client.request_timeout, Duration::from_secs(3));
        assert_eq!(client.base_url.as_str(), "http://localhost:9547/");
    }
}
