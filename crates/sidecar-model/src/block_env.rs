use alloy_consensus::Header;
use alloy_eips::eip4844::{
    BLOB_GASPRICE_UPDATE_FRACTION,
    BLOB_TX_MIN_BLOB_GASPRICE,
    fake_exponential,
};
use alloy_primitives::{
    Address,
    B256,
    U256,
};
use credible_utils::hex::quantity;
use serde::{
    Deserialize,
    Serialize,
};

/// Base fee reported for headers that predate EIP-1559.
pub const DEFAULT_BASE_FEE: u64 = 1;

/// Block environment pushed to the sidecar when a block is added to the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEnv {
    #[serde(with = "quantity")]
    pub number: u64,
    pub coinbase: Address,
    #[serde(with = "quantity")]
    pub timestamp: u64,
    #[serde(with = "quantity")]
    pub gas_limit: u64,
    #[serde(with = "quantity")]
    pub base_fee: u64,
    #[serde(with = "quantity")]
    pub difficulty: U256,
    pub prevrandao: B256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_excess_gas_and_price: Option<BlobExcessGasAndPrice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobExcessGasAndPrice {
    #[serde(with = "quantity")]
    pub excess_blob_gas: u64,
    #[serde(with = "quantity")]
    pub blob_gasprice: u128,
}

impl BlobExcessGasAndPrice {
    pub fn new(excess_blob_gas: u64, update_fraction: u128) -> Self {
        Self {
            excess_blob_gas,
            blob_gasprice: fake_exponential(
                BLOB_TX_MIN_BLOB_GASPRICE,
                u128::from(excess_blob_gas),
                update_fraction,
            ),
        }
    }
}

/// Values substituted for header fields that are absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEnvDefaults {
    pub base_fee: u64,
    /// Denominator of the blob gas price exponential.
    pub blob_base_fee_update_fraction: u128,
}

impl Default for BlockEnvDefaults {
    fn default() -> Self {
        Self {
            base_fee: DEFAULT_BASE_FEE,
            blob_base_fee_update_fraction: BLOB_GASPRICE_UPDATE_FRACTION,
        }
    }
}

pub fn encode_block_env(header: &Header, defaults: &BlockEnvDefaults) -> BlockEnv {
    BlockEnv {
        number: header.number,
        coinbase: header.beneficiary,
        timestamp: header.timestamp,
        gas_limit: header.gas_limit,
        base_fee: header.base_fee_per_gas.unwrap_or(defaults.base_fee),
        difficulty: header.difficulty,
        prevrandao: header.mix_hash,
        blob_excess_gas_and_price: header.excess_blob_gas.map(|excess| {
            BlobExcessGasAndPrice::new(excess, defaults.blob_base_fee_update_fraction)
        }),
    }
}
