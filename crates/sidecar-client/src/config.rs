use std::time::Duration;

use url::Url;

use crate::error::BuildError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_WORKER_THREADS: usize = 2;
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 32;
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Settings for a [`SidecarClient`](crate::SidecarClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarClientConfig {
    pub base_url: Url,
    /// Bound on a whole request, connect through body.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Worker threads of the runtime the client owns.
    pub worker_threads: usize,
    pub pool_max_idle_per_host: usize,
    /// How long `shutdown` waits for in-flight work to drain.
    pub shutdown_grace: Duration,
}

impl SidecarClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            worker_threads: DEFAULT_WORKER_THREADS,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    /// Parse `base_url` and apply defaults. Only `http` and `https` are accepted.
    pub fn parse(base_url: &str) -> Result<Self, BuildError> {
        let base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => Ok(Self::new(base_url)),
            other => Err(BuildError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    pub fn with_pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}
