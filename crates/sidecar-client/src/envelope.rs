//! JSON-RPC 2.0 envelopes.

use serde::{
    Deserialize,
    Serialize,
    de::DeserializeOwned,
};
use serde_json::Value;

use crate::error::{
    Result,
    SidecarClientError,
};

pub const JSONRPC_VERSION: &str = "2.0";

/// Fresh correlation id for an outgoing request.
pub fn next_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    /// `None` marks a notification; the field is omitted on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RpcRequest {
    pub fn new<P: Serialize>(method: impl Into<String>, params: P, id: Option<String>) -> Result<Self> {
        let params = serde_json::to_value(params)
            .map_err(|e| SidecarClientError::Encoding(e.to_string()))?;
        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        })
    }

    /// Request with a fresh correlation id.
    pub fn call<P: Serialize>(method: impl Into<String>, params: P) -> Result<Self> {
        Self::new(method, params, Some(next_request_id()))
    }

    pub fn notification<P: Serialize>(method: impl Into<String>, params: P) -> Result<Self> {
        Self::new(method, params, None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
    /// Peers echo the id back as sent, but error responses to unparseable requests carry `null`.
    #[serde(default)]
    pub id: Option<Value>,
}

impl RpcResponse {
    /// Checks the protocol version and that the response answers the request with `expected_id`.
    ///
    /// An error envelope with a `null` id is accepted so the peer's error reaches the caller.
    pub fn validate(&self, expected_id: &str) -> Result<()> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(SidecarClientError::Decode(format!(
                "Invalid JSON-RPC version: expected '{JSONRPC_VERSION}', got '{}'",
                self.jsonrpc
            )));
        }

        match &self.id {
            Some(Value::String(id)) if id == expected_id => Ok(()),
            None | Some(Value::Null) if self.error.is_some() => Ok(()),
            other => {
                Err(SidecarClientError::Decode(format!(
                    "Request/response ID mismatch: expected {expected_id}, got {}",
                    other.as_ref().map_or_else(|| "none".to_string(), Value::to_string)
                )))
            }
        }
    }

    /// Converts the envelope into the call outcome. A missing or `null` result decodes as
    /// JSON `null`, so `()` and `Option<_>` results accept it.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        if let Some(error) = self.error {
            return Err(SidecarClientError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        serde_json::from_value(self.result.unwrap_or(Value::Null))
            .map_err(|e| SidecarClientError::Decode(format!("unexpected result shape: {e}")))
    }
}
