//! Credible layer command arguments
use std::time::Duration;

use crate::config::{
    AdmissionConfig,
    ConfigError,
};

pub mod file;

/// Options a host node flattens into its own command line.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
#[command(next_help_heading = "Credible Layer")]
pub struct CredibleSidecarArgs {
    /// Consult the credible layer sidecar while building blocks
    #[arg(
        long = "plugin-credible-sidecar-enabled",
        default_value = "true",
        env = "CREDIBLE_SIDECAR_ENABLED",
        num_args = 0..=1,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub enabled: bool,

    /// JSON-RPC endpoint of the sidecar
    #[arg(
        long = "plugin-credible-sidecar-rpc-endpoint",
        value_name = "URL",
        env = "CREDIBLE_SIDECAR_RPC_ENDPOINT"
    )]
    pub rpc_endpoint: Option<String>,

    /// How long post-processing waits for a validation result, in milliseconds
    #[arg(
        long = "plugin-credible-sidecar-poll-timeout-ms",
        default_value = "1000",
        env = "CREDIBLE_SIDECAR_POLL_TIMEOUT_MS"
    )]
    pub poll_timeout_ms: u64,

    /// Bound on the transaction submit made during pre-processing, in milliseconds
    #[arg(
        long = "plugin-credible-sidecar-submit-timeout-ms",
        default_value = "500",
        env = "CREDIBLE_SIDECAR_SUBMIT_TIMEOUT_MS"
    )]
    pub submit_timeout_ms: u64,

    /// Bound on the block environment push made for every new block, in milliseconds
    #[arg(
        long = "plugin-credible-sidecar-block-env-timeout-ms",
        default_value = "500",
        env = "CREDIBLE_SIDECAR_BLOCK_ENV_TIMEOUT_MS"
    )]
    pub block_env_timeout_ms: u64,

    /// HTTP request timeout, in milliseconds
    #[arg(
        long = "plugin-credible-sidecar-request-timeout-ms",
        default_value = "30000",
        env = "CREDIBLE_SIDECAR_REQUEST_TIMEOUT_MS"
    )]
    pub request_timeout_ms: u64,

    /// HTTP connect timeout, in milliseconds
    #[arg(
        long = "plugin-credible-sidecar-connect-timeout-ms",
        default_value = "30000",
        env = "CREDIBLE_SIDECAR_CONNECT_TIMEOUT_MS"
    )]
    pub connect_timeout_ms: u64,

    /// Threads of the runtime that drives sidecar requests
    #[arg(
        long = "plugin-credible-sidecar-worker-threads",
        default_value = "2",
        env = "CREDIBLE_SIDECAR_WORKER_THREADS"
    )]
    pub worker_threads: usize,

    /// Seconds after which an unconsumed pending request is dropped
    #[arg(
        long = "plugin-credible-sidecar-pending-ttl-secs",
        default_value = "60",
        env = "CREDIBLE_SIDECAR_PENDING_TTL_SECS"
    )]
    pub pending_ttl_secs: u64,

    /// Submit a minimal environment for transactions that fail to encode
    #[arg(
        long = "plugin-credible-sidecar-encode-fallback",
        default_value = "false",
        env = "CREDIBLE_SIDECAR_ENCODE_FALLBACK",
        action = clap::ArgAction::Set
    )]
    pub encode_fallback: bool,

    /// Base fee reported for blocks without one
    #[arg(
        long = "plugin-credible-sidecar-default-base-fee",
        default_value = "1",
        env = "CREDIBLE_SIDECAR_DEFAULT_BASE_FEE"
    )]
    pub default_base_fee: u64,
}

impl TryFrom<CredibleSidecarArgs> for AdmissionConfig {
    type Error = ConfigError;

    fn try_from(args: CredibleSidecarArgs) -> Result<Self, Self::Error> {
        let config = Self {
            enabled: args.enabled,
            sidecar_url: args.rpc_endpoint.unwrap_or_default(),
            poll_timeout: Duration::from_millis(args.poll_timeout_ms),
            submit_timeout: Duration::from_millis(args.submit_timeout_ms),
            block_env_timeout: Duration::from_millis(args.block_env_timeout_ms),
            request_timeout: Duration::from_millis(args.request_timeout_ms),
            connect_timeout: Duration::from_millis(args.connect_timeout_ms),
            worker_threads: args.worker_threads,
            pending_ttl: Duration::from_secs(args.pending_ttl_secs),
            encode_fallback: args.encode_fallback,
            default_base_fee: args.default_base_fee,
        };
        config.validate()?;
        Ok(config)
    }
}
