//! Wire model of the credible layer sidecar API.
//!
//! [`encode_transaction`] and [`encode_block_env`] translate alloy domain objects into the
//! hex-encoded environments the sidecar validates against; [`api`] holds the request and
//! response bodies of each RPC method.

pub mod api;
mod block_env;
mod encoder;
mod transaction;
mod tx_env;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use block_env::{
    BlobExcessGasAndPrice,
    BlockEnv,
    BlockEnvDefaults,
    DEFAULT_BASE_FEE,
    encode_block_env,
};
pub use encoder::{
    EncodingError,
    encode_transaction,
    encode_transaction_or_minimal,
    minimal_tx_env,
    transaction_type_name,
};
pub use transaction::CandidateTransaction;
pub use tx_env::{
    AccessListEntry,
    AuthorizationEnv,
    TxEnv,
    TxKindEnv,
};
