use std::time::Duration;

use flume::{
    Receiver,
    RecvTimeoutError,
};

use crate::error::{
    Result,
    WaitError,
};

/// Handle to a call running on the client's runtime.
///
/// Every way of reading the outcome consumes the handle, so a result is observed at most once.
/// Dropping the handle, or letting [`wait_timeout`](Self::wait_timeout) expire, does not cancel
/// the request; it completes in the background and its result is discarded.
///
/// Waiting does not need a tokio context: `wait` and `wait_timeout` block the calling thread on
/// a channel, so they are safe to use from plain worker threads.
#[derive(Debug)]
#[must_use = "dropping a pending call discards its result"]
pub struct PendingCall<T> {
    method: String,
    id: Option<String>,
    rx: Receiver<Result<T>>,
}

impl<T> PendingCall<T> {
    pub(crate) fn new(method: impl Into<String>, id: Option<String>, rx: Receiver<Result<T>>) -> Self {
        Self {
            method: method.into(),
            id,
            rx,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Correlation id of the underlying request, if it was ever built.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// True once a result is ready or the task went away without one.
    pub fn is_finished(&self) -> bool {
        !self.rx.is_empty() || self.rx.is_disconnected()
    }

    /// Block until the call completes.
    pub fn wait(self) -> Result<T, WaitError> {
        match self.rx.recv() {
            Ok(result) => result.map_err(WaitError::Call),
            Err(_) => Err(WaitError::Abandoned),
        }
    }

    /// Block for at most `timeout`.
    pub fn wait_timeout(self, timeout: Duration) -> Result<T, WaitError> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result.map_err(WaitError::Call),
            Err(RecvTimeoutError::Timeout) => Err(WaitError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(WaitError::Abandoned),
        }
    }

    /// Await the outcome from async code.
    pub async fn resolve(self) -> Result<T, WaitError> {
        match self.rx.recv_async().await {
            Ok(result) => result.map_err(WaitError::Call),
            Err(_) => Err(WaitError::Abandoned),
        }
    }
}
