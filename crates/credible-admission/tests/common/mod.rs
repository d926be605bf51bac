#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::Once,
    time::Duration,
};

use alloy_primitives::B256;
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
    matchers::{
        body_partial_json,
        method,
    },
};

/// Installs a fmt subscriber when `TEST_TRACE` names a level (`debug`, `trace`, `info`, ...).
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use tracing_subscriber::{
            filter::filter_fn,
            prelude::*,
        };
        let Ok(v) = std::env::var("TEST_TRACE") else {
            return;
        };
        let level = match v.as_str() {
            "true" | "debug" | "on" => tracing::Level::DEBUG,
            "trace" => tracing::Level::TRACE,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => return,
        };
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .with(filter_fn(move |metadata| metadata.level() <= &level))
            .try_init();
    });
}

pub const SEND_TRANSACTIONS: &str = "sendTransactions";
pub const GET_TRANSACTIONS: &str = "getTransactions";
pub const SEND_BLOCK_ENV: &str = "sendBlockEnv";

/// A wiremock sidecar driven from synchronous tests.
///
/// The hooks under test block their calling thread, so tests are plain `#[test]` functions and
/// only mock setup runs on this helper runtime.
pub struct MockSidecar {
    server: MockServer,
    runtime: Runtime,
}

impl MockSidecar {
    pub fn start() -> Self {
        init_tracing();
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

    /// Answer `rpc_method` with `responder`.
    pub fn on<R: Respond + 'static>(&self, rpc_method: &str, responder: R) {
        self.mount(
            Mock::given(method("POST"))
                .and(body_partial_json(json!({ "method": rpc_method })))
                .respond_with(responder),
        );
    }

    /// Accept every submitted transaction.
    pub fn accept_submissions(&self) {
        self.on(SEND_TRANSACTIONS, Submissions::default());
    }

    pub fn verify(&self) {
        self.runtime.block_on(self.server.verify());
    }

    /// JSON-RPC requests received so far for `rpc_method`.
    pub fn requests_for(&self, rpc_method: &str) -> Vec<Value> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
            .filter(|body| body["method"] == rpc_method)
            .collect()
    }
}

fn reply(request: &Request, result: Value) -> ResponseTemplate {
    let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": body["id"],
        "result": result,
    }))
}

fn requested_hashes(request: &Request, field: &str) -> Vec<Value> {
    let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
    match field {
        "transactions" => {
            body["params"]["transactions"]
                .as_array()
                .map(|txs| txs.iter().map(|tx| tx["hash"].clone()).collect())
                .unwrap_or_default()
        }
        _ => body["params"][field].as_array().cloned().unwrap_or_default(),
    }
}

/// `sendTransactions` responder: queues every hash except those listed as failed.
#[derive(Clone, Default)]
pub struct Submissions {
    failed: Vec<B256>,
    delay: Duration,
}

impl Submissions {
    pub fn failing(failed: Vec<B256>) -> Self {
        Self {
            failed,
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Respond for Submissions {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let failed: Vec<Value> = self
            .failed
            .iter()
            .map(|hash| json!(format!("{hash:#x}")))
            .collect();
        let queued: Vec<Value> = requested_hashes(request, "transactions")
            .into_iter()
            .filter(|hash| !failed.contains(hash))
            .collect();
        reply(request, json!({ "queued": queued, "failed": failed })).set_delay(self.delay)
    }
}

/// `getTransactions` responder: reports a configured status per hash, `not_found` otherwise.
#[derive(Clone, Default)]
pub struct Verdicts {
    statuses: HashMap<B256, &'static str>,
    unrequested: Vec<(B256, &'static str)>,
    delay: Duration,
}

impl Verdicts {
    pub fn with(mut self, hash: B256, status: &'static str) -> Self {
        self.statuses.insert(hash, status);
        self
    }

    /// Also report `hash` in every response, whether or not it was asked for.
    pub fn reporting(mut self, hash: B256, status: &'static str) -> Self {
        self.unrequested.push((hash, status));
        self
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Respond for Verdicts {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut results = Vec::new();
        let mut not_found = Vec::new();
        for hash in requested_hashes(request, "hashes") {
            let known = hash
                .as_str()
                .and_then(|raw| raw.parse::<B256>().ok())
                .and_then(|parsed| self.statuses.get(&parsed));
            match known {
                Some(status) => {
                    results.push(json!({ "hash": hash, "status": status, "gas_used": 21000 }));
                }
                None => not_found.push(hash),
            }
        }
        for (hash, status) in &self.unrequested {
            results.push(json!({
                "hash": format!("{hash:#x}"),
                "status": status,
                "gas_used": 21000,
            }));
        }
        reply(request, json!({ "results": results, "not_found": not_found }))
            .set_delay(self.delay)
    }
}

/// `sendBlockEnv` responder.
#[derive(Clone)]
pub struct BlockEnvAck {
    success: bool,
    error: Option<&'static str>,
    delay: Duration,
}

impl BlockEnvAck {
    pub fn accepted() -> Self {
        Self {
            success: true,
            error: None,
            delay: Duration::ZERO,
        }
    }

    pub fn rejected(error: &'static str) -> Self {
        Self {
            success: false,
            error: Some(error),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Respond for BlockEnvAck {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        reply(
            request,
            json!({ "success": self.success, "error": self.error }),
        )
        .set_delay(self.delay)
    }
}
