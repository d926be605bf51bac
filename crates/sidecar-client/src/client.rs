use std::{
    future::Future,
    time::Duration,
};

use parking_lot::Mutex;
use reqwest::Client;
use serde::{
    Serialize,
    de::DeserializeOwned,
};
use tokio::runtime::{
    Builder,
    Handle,
    Runtime,
};
use tokio_util::{
    sync::CancellationToken,
    task::TaskTracker,
};
use tracing::{
    debug,
    info,
    instrument,
    trace,
    warn,
};
use url::Url;

use crate::{
    config::SidecarClientConfig,
    envelope::{
        RpcRequest,
        RpcResponse,
    },
    error::{
        BuildError,
        Result,
        SidecarClientError,
    },
    pending::PendingCall,
};

/// JSON-RPC client for the credible layer sidecar.
///
/// The client owns a multi-threaded tokio runtime on which every request executes, so it can be
/// driven from plain (non-async) threads such as block-building workers. Blocking methods park
/// the calling thread on a channel until the runtime delivers the result; `call_async` returns a
/// [`PendingCall`] immediately.
///
/// Lifecycle:
/// 1. Running: requests are spawned on the runtime and tracked.
/// 2. Shutting down: [`shutdown`](Self::shutdown) cancels tracked requests (they resolve with a
///    transport error), waits up to the grace period for them to drain, then stops the runtime
///    and drops pooled connections. Later calls fail with `Transport("client is shut down")`.
///
/// Dropping the client performs the shutdown with the configured grace period.
#[derive(Debug)]
pub struct SidecarClient {
    rpc: HttpRpc,
    handle: Handle,
    runtime: Mutex<Option<Runtime>>,
    shutdown: CancellationToken,
    tasks: TaskTracker,
    shutdown_grace: Duration,
}

/// The HTTP half of the client; cheap to clone into spawned requests.
#[derive(Debug, Clone)]
struct HttpRpc {
    http: Client,
    base_url: Url,
}

impl HttpRpc {
    async fn post<B: Serialize + ?Sized>(&self, body: &B) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(self.base_url.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SidecarClientError::Transport(format!(
                "HTTP error: {status}"
            )));
        }
        Ok(response)
    }

    async fn post_for_body<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<u8>> {
        let body = self.post(body).await?.bytes().await?;
        if body.is_empty() {
            return Err(SidecarClientError::Transport(
                "Empty response body".to_string(),
            ));
        }
        Ok(body.to_vec())
    }

    async fn request<T: DeserializeOwned>(&self, request: RpcRequest) -> Result<T> {
        let body = self.post_for_body(&request).await?;
        let response: RpcResponse = serde_json::from_slice(&body).map_err(|e| {
            SidecarClientError::Decode(format!("malformed JSON-RPC response: {e}"))
        })?;

        response.validate(request.id.as_deref().unwrap_or_default())?;
        response.into_result()
    }

    async fn notify(&self, request: RpcRequest) -> Result<()> {
        self.post(&request).await.map(drop)
    }

    async fn batch(&self, requests: Vec<RpcRequest>) -> Result<Vec<RpcResponse>> {
        let body = self.post_for_body(&requests).await?;
        let responses: Vec<RpcResponse> = match serde_json::from_slice(&body) {
            Ok(responses) => responses,
            Err(e) => {
                // A batch rejected as a whole is answered with a single error object.
                if let Ok(RpcResponse {
                    error: Some(error), ..
                }) = serde_json::from_slice(&body)
                {
                    return Err(SidecarClientError::Rpc {
                        code: error.code,
                        message: error.message,
                        data: error.data,
                    });
                }
                return Err(SidecarClientError::Decode(format!(
                    "malformed JSON-RPC batch response: {e}"
                )));
            }
        };

        if responses.len() != requests.len() {
            return Err(SidecarClientError::Decode(format!(
                "batch of {} requests answered with {} responses",
                requests.len(),
                responses.len()
            )));
        }
        Ok(responses)
    }
}

impl SidecarClient {
    pub fn new(config: SidecarClientConfig) -> Result<Self, BuildError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .thread_name("sidecar-client")
            .enable_all()
            .build()
            .map_err(BuildError::Runtime)?;

        let http = Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(BuildError::Http)?;

        debug!(
            base_url = %config.base_url,
            worker_threads = config.worker_threads,
            request_timeout_ms = config.request_timeout.as_millis(),
            "sidecar client started"
        );

        Ok(Self {
            rpc: HttpRpc {
                http,
                base_url: config.base_url,
            },
            handle: runtime.handle().clone(),
            runtime: Mutex::new(Some(runtime)),
            shutdown: CancellationToken::new(),
            tasks: TaskTracker::new(),
            shutdown_grace: config.shutdown_grace,
        })
    }

    /// Client for `base_url` with default settings.
    pub fn connect(base_url: &str) -> Result<Self, BuildError> {
        Self::new(SidecarClientConfig::parse(base_url)?)
    }

    pub fn base_url(&self) -> &Url {
        &self.rpc.base_url
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Number of requests still running on the client runtime.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Spawn `work` on the client runtime. The returned channel yields exactly one result, or
    /// disconnects if the runtime went away before the work ran.
    fn dispatch<R, F>(&self, work: F) -> flume::Receiver<Result<R>>
    where
        R: Send + 'static,
        F: Future<Output = Result<R>> + Send + 'static,
    {
        let (tx, rx) = flume::bounded(1);
        if self.shutdown.is_cancelled() {
            let _ = tx.send(Err(SidecarClientError::shut_down()));
            return rx;
        }

        let shutdown = self.shutdown.clone();
        self.tasks.spawn_on(
            async move {
                let result = tokio::select! {
                    () = shutdown.cancelled() => Err(SidecarClientError::shut_down()),
                    result = work => result,
                };
                if tx.send(result).is_err() {
                    trace!("pending call dropped before completion, discarding result");
                }
            },
            &self.handle,
        );
        rx
    }

    /// Issue a call and return immediately with a handle to its outcome.
    pub fn call_async<P, T>(&self, method: &str, params: P) -> PendingCall<T>
    where
        P: Serialize,
        T: DeserializeOwned + Send + 'static,
    {
        match RpcRequest::call(method, params) {
            Ok(request) => {
                let id = request.id.clone();
                trace!(method, id = ?id, "dispatching sidecar call");
                let rpc = self.rpc.clone();
                let rx = self.dispatch(async move { rpc.request(request).await });
                PendingCall::new(method, id, rx)
            }
            Err(err) => {
                let (tx, rx) = flume::bounded(1);
                let _ = tx.send(Err(err));
                PendingCall::new(method, None, rx)
            }
        }
    }

    /// Issue a call and block until its correlated response arrives.
    #[instrument(name = "sidecar_client::call", skip(self, params), level = "debug")]
    pub fn call<P, T>(&self, method: &str, params: P) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned + Send + 'static,
    {
        self.call_async(method, params).wait().map_err(Into::into)
    }

    /// [`call`](Self::call) bounded by `timeout`. On expiry the request keeps running in the
    /// background and its result is discarded.
    #[instrument(name = "sidecar_client::call_timeout", skip(self, params), level = "debug")]
    pub fn call_timeout<P, T>(&self, method: &str, params: P, timeout: Duration) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned + Send + 'static,
    {
        self.call_async(method, params)
            .wait_timeout(timeout)
            .map_err(Into::into)
    }

    /// Send a notification. Any 2xx status is success; the body is ignored.
    #[instrument(name = "sidecar_client::notify", skip(self, params), level = "debug")]
    pub fn notify<P: Serialize>(&self, method: &str, params: P) -> Result<()> {
        let request = RpcRequest::notification(method, params)?;
        let rpc = self.rpc.clone();
        let rx = self.dispatch(async move { rpc.notify(request).await });
        PendingCall::new(method, None, rx).wait().map_err(Into::into)
    }

    /// Send several calls as one JSON array. Responses are returned in the order the peer sent
    /// them and matched to requests by position only.
    #[instrument(name = "sidecar_client::batch_call", skip_all, level = "debug")]
    pub fn batch_call<I, M, P>(&self, calls: I) -> Result<Vec<RpcResponse>>
    where
        I: IntoIterator<Item = (M, P)>,
        M: Into<String>,
        P: Serialize,
    {
        let requests = calls
            .into_iter()
            .map(|(method, params)| RpcRequest::call(method, params))
            .collect::<Result<Vec<_>>>()?;
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let rpc = self.rpc.clone();
        let rx = self.dispatch(async move { rpc.batch(requests).await });
        PendingCall::new("batch", None, rx).wait().map_err(Into::into)
    }

    /// Cancel in-flight requests, wait up to `grace` for them to drain and stop the runtime.
    /// Calling it again is a no-op.
    pub fn shutdown(&self, grace: Duration) {
        let Some(runtime) = self.runtime.lock().take() else {
            return;
        };

        self.shutdown.cancel();
        self.tasks.close();

        if Handle::try_current().is_ok() {
            // Inside someone's async context; blocking here would panic.
            runtime.shutdown_background();
        } else {
            let tasks = self.tasks.clone();
            let drained = runtime
                .block_on(async move { tokio::time::timeout(grace, tasks.wait()).await })
                .is_ok();
            if !drained {
                warn!(
                    grace_ms = grace.as_millis(),
                    in_flight = self.tasks.len(),
                    "sidecar client requests did not drain before shutdown"
                );
            }
            runtime.shutdown_timeout(grace);
        }

        info!(base_url = %self.rpc.base_url, "sidecar client shut down");
    }
}

impl Drop for SidecarClient {
    fn drop(&mut self) {
        self.shutdown(self.shutdown_grace);
    }
}
