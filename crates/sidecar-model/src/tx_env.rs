use alloy_eips::{
    eip2930::AccessListItem,
    eip7702::SignedAuthorization,
};
use alloy_primitives::{
    Address,
    B256,
    Bytes,
    U256,
};
use credible_utils::hex::quantity;
use serde::{
    Deserialize,
    Serialize,
};

/// Transaction environment submitted to the sidecar.
///
/// Type-conditional fields (`gas_priority_fee`, `max_fee_per_blob_gas`, `blob_hashes`,
/// `authorization_list`) hold `0x0` or `[]` for types that do not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEnv {
    #[serde(with = "quantity")]
    pub tx_type: u8,
    pub caller: Address,
    #[serde(with = "quantity")]
    pub gas_limit: u64,
    /// Gas price for legacy and access-list transactions, max fee per gas otherwise.
    #[serde(with = "quantity")]
    pub gas_price: u128,
    #[serde(with = "quantity")]
    pub gas_priority_fee: u128,
    pub kind: TxKindEnv,
    #[serde(with = "quantity")]
    pub value: U256,
    pub data: Bytes,
    #[serde(with = "quantity")]
    pub nonce: u64,
    #[serde(
        with = "quantity::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub chain_id: Option<u64>,
    pub access_list: Vec<AccessListEntry>,
    #[serde(with = "quantity")]
    pub max_fee_per_blob_gas: u128,
    pub blob_hashes: Vec<B256>,
    pub authorization_list: Vec<AuthorizationEnv>,
}

/// Destination of a transaction: `{"type":"call","to":"0x.."}` or `{"type":"create"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TxKindEnv {
    Call { to: Address },
    Create,
}

impl From<Option<Address>> for TxKindEnv {
    fn from(to: Option<Address>) -> Self {
        to.map_or(Self::Create, |to| Self::Call { to })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessListEntry {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

impl From<&AccessListItem> for AccessListEntry {
    fn from(item: &AccessListItem) -> Self {
        Self {
            address: item.address,
            storage_keys: item.storage_keys.clone(),
        }
    }
}

/// One signed EIP-7702 authorization tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationEnv {
    #[serde(with = "quantity")]
    pub chain_id: U256,
    pub address: Address,
    #[serde(with = "quantity")]
    pub nonce: u64,
    #[serde(with = "quantity")]
    pub y_parity: u8,
    #[serde(with = "quantity")]
    pub r: U256,
    #[serde(with = "quantity")]
    pub s: U256,
}

impl From<&SignedAuthorization> for AuthorizationEnv {
    fn from(signed: &SignedAuthorization) -> Self {
        let authorization = signed.inner();
        Self {
            chain_id: authorization.chain_id,
            address: authorization.address,
            nonce: authorization.nonce,
            y_parity: signed.y_parity(),
            r: signed.r(),
            s: signed.s(),
        }
    }
}
