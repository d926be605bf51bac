//! Request and response bodies of the sidecar RPC methods.

use alloy_primitives::B256;
use credible_utils::hex::quantity;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

use crate::TxEnv;

pub const SEND_TRANSACTIONS: &str = "sendTransactions";
pub const GET_TRANSACTIONS: &str = "getTransactions";
pub const SEND_BLOCK_ENV: &str = "sendBlockEnv";

/// `null` and absent arrays both read as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSubmission {
    #[serde(rename = "txEnv")]
    pub tx_env: TxEnv,
    pub hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTransactionsRequest {
    pub transactions: Vec<TransactionSubmission>,
}

impl SendTransactionsRequest {
    pub fn single(tx_env: TxEnv, hash: B256) -> Self {
        Self {
            transactions: vec![TransactionSubmission { tx_env, hash }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTransactionsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub queued: Vec<B256>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub failed: Vec<B256>,
}

impl SendTransactionsResponse {
    pub fn is_failed(&self, hash: &B256) -> bool {
        self.failed.contains(hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionsRequest {
    pub hashes: Vec<B256>,
}

impl GetTransactionsRequest {
    pub fn single(hash: B256) -> Self {
        Self { hashes: vec![hash] }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<TransactionResult>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub not_found: Vec<B256>,
}

impl GetTransactionsResponse {
    pub fn find(&self, hash: &B256) -> Option<&TransactionResult> {
        self.results.iter().find(|result| &result.hash == hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub hash: B256,
    pub status: TransactionStatus,
    #[serde(
        default,
        deserialize_with = "quantity::lenient_u64::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub gas_used: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validation outcome reported by the sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Success,
    AssertionFailed,
    Failed,
    Reverted,
    Halted,
    /// Any status this build does not know about.
    #[serde(other)]
    Other,
}

impl TransactionStatus {
    /// Statuses that keep a transaction out of the block.
    pub fn is_rejection(self) -> bool {
        matches!(self, Self::AssertionFailed | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AssertionFailed => "assertion_failed",
            Self::Failed => "failed",
            Self::Reverted => "reverted",
            Self::Halted => "halted",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendBlockEnvResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
