use std::time::Duration;

use serde_json::Value;

pub type Result<T, E = SidecarClientError> = std::result::Result<T, E>;

/// Failure of a single sidecar call.
///
/// Kept `Clone` so results can be handed across the client's result channel and logged by
/// several owners.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SidecarClientError {
    /// Connection failure, request timeout, non-2xx status, empty body or a closed client.
    #[error("transport error: {0}")]
    Transport(String),
    /// The sidecar answered with a JSON-RPC error envelope.
    #[error("JSON-RPC error code {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },
    /// The response envelope or its result could not be converted.
    #[error("invalid response: {0}")]
    Decode(String),
    /// The request parameters could not be serialized.
    #[error("failed to encode request: {0}")]
    Encoding(String),
}

impl SidecarClientError {
    pub(crate) fn shut_down() -> Self {
        Self::Transport("client is shut down".to_string())
    }
}

impl From<reqwest::Error> for SidecarClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Failure while waiting on a [`PendingCall`](crate::PendingCall).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaitError {
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("call was abandoned before it produced a result")]
    Abandoned,
    #[error(transparent)]
    Call(#[from] SidecarClientError),
}

impl From<WaitError> for SidecarClientError {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::Timeout(timeout) => {
                Self::Transport(format!("no response within {timeout:?}"))
            }
            WaitError::Abandoned => Self::Transport("call was abandoned".to_string()),
            WaitError::Call(err) => err,
        }
    }
}

/// Failure to construct a [`SidecarClient`](crate::SidecarClient).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid sidecar URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported URL scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
    #[error("failed to start client runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to build HTTP client: {0}")]
    Http(#[source] reqwest::Error),
}
