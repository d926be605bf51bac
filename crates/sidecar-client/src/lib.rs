//! Client for the credible layer sidecar's JSON-RPC 2.0 API.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use serde_json::{
//!     Value,
//!     json,
//! };
//! use sidecar_client::SidecarClient;
//!
//! let client = SidecarClient::connect("http://localhost:9547").unwrap();
//!
//! // Blocking call from a plain thread.
//! let queued: Value = client
//!     .call("sendTransactions", json!({ "transactions": [] }))
//!     .unwrap();
//!
//! // Fire now, collect later.
//! let pending = client.call_async::<_, Value>("getTransactions", json!({ "hashes": [] }));
//! let results = pending.wait_timeout(Duration::from_secs(1));
//! ```

mod client;
mod config;
mod envelope;
mod error;
mod pending;

pub use client::SidecarClient;
pub use config::{
    DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_POOL_MAX_IDLE_PER_HOST,
    DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SHUTDOWN_GRACE,
    DEFAULT_WORKER_THREADS,
    SidecarClientConfig,
};
pub use envelope::{
    JSONRPC_VERSION,
    RpcErrorObject,
    RpcRequest,
    RpcResponse,
    next_request_id,
};
pub use error::{
    BuildError,
    Result,
    SidecarClientError,
    WaitError,
};
pub use pending::PendingCall;
