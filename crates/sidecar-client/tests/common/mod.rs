#![allow(dead_code)]

use std::time::Duration;

use serde_json::{
    Value,
    json,
};
use tokio::runtime::Runtime;
use wiremock::{
    Mock,
    MockServer,
    Request,
    Respond,
    ResponseTemplate,
};

/// A wiremock server driven from synchronous tests.
///
/// The client under test owns its own runtime and blocks the calling thread, so tests are plain
/// `#[test]` functions and only the mock setup runs on this helper runtime.
pub struct MockSidecar {
    server: MockServer,
    runtime: Runtime,
}

impl MockSidecar {
    pub fn start() -> Self {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn verify(&self) {
        self.runtime.block_on(self.server.verify());
    }

    /// JSON bodies of every request received so far.
    pub fn received_bodies(&self) -> Vec<Value> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect()
    }
}

/// Answers each JSON-RPC request with the same payload, echoing the request's id back.
#[derive(Clone)]
pub struct RpcReply {
    payload: Payload,
    delay: Duration,
}

#[derive(Clone)]
enum Payload {
    Result(Value),
    Error(Value),
}

impl RpcReply {
    pub fn result(result: Value) -> Self {
        Self {
            payload: Payload::Result(result),
            delay: Duration::ZERO,
        }
    }

    pub fn error(code: i64, message: &str, data: Option<Value>) -> Self {
        let mut error = json!({ "code": code, "message": message });
        if let Some(data) = data {
            error["data"] = data;
        }
        Self {
            payload: Payload::Error(error),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn envelope(&self, id: Value) -> Value {
        match &self.payload {
            Payload::Result(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Payload::Error(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
        }
    }
}

impl Respond for RpcReply {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let reply = match &body {
            Value::Array(calls) => {
                Value::Array(
                    calls
                        .iter()
                        .map(|call| self.envelope(call["id"].clone()))
                        .collect(),
                )
            }
            call => self.envelope(call["id"].clone()),
        };
        ResponseTemplate::new(200)
            .set_body_json(reply)
            .set_delay(self.delay)
    }
}
