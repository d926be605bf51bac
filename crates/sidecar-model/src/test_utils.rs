//! Hand-built candidate transactions for tests.
//!
//! Unlike real envelopes these can hold field combinations that no valid transaction has, which
//! is what the encoder's validation needs to be exercised against.

use alloy_eips::{
    eip2930::AccessList,
    eip7702::SignedAuthorization,
};
use alloy_primitives::{
    Address,
    B256,
    Bytes,
    U256,
};

use crate::CandidateTransaction;

#[derive(Debug, Clone, PartialEq)]
pub struct TestTransaction {
    pub hash: B256,
    pub tx_type: u8,
    pub sender: Address,
    pub gas_limit: u64,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub nonce: u64,
    pub chain_id: Option<u64>,
    pub access_list: Option<AccessList>,
    pub max_fee_per_blob_gas: Option<u128>,
    pub blob_versioned_hashes: Option<Vec<B256>>,
    pub authorization_list: Option<Vec<SignedAuthorization>>,
}

impl TestTransaction {
    pub fn legacy() -> Self {
        Self {
            hash: B256::repeat_byte(0x11),
            tx_type: 0,
            sender: Address::repeat_byte(0x01),
            gas_limit: 21_000,
            gas_price: Some(1_000_000_000),
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            to: Some(Address::with_last_byte(0xaa)),
            value: U256::ZERO,
            input: Bytes::new(),
            nonce: 0,
            chain_id: Some(1),
            access_list: None,
            max_fee_per_blob_gas: None,
            blob_versioned_hashes: None,
            authorization_list: None,
        }
    }

    pub fn eip2930() -> Self {
        Self {
            tx_type: 1,
            access_list: Some(AccessList::default()),
            ..Self::legacy()
        }
    }

    pub fn eip1559() -> Self {
        Self {
            tx_type: 2,
            gas_price: None,
            max_fee_per_gas: Some(2_000_000_000),
            max_priority_fee_per_gas: Some(1_000_000_000),
            access_list: Some(AccessList::default()),
            ..Self::legacy()
        }
    }

    pub fn eip4844() -> Self {
        Self {
            tx_type: 3,
            max_fee_per_blob_gas: Some(1),
            blob_versioned_hashes: Some(vec![B256::repeat_byte(0x01)]),
            ..Self::eip1559()
        }
    }

    pub fn eip7702() -> Self {
        Self {
            tx_type: 4,
            authorization_list: Some(vec![SignedAuthorization::new_unchecked(
                alloy_eips::eip7702::Authorization {
                    chain_id: U256::from(1),
                    address: Address::with_last_byte(0xbb),
                    nonce: 0,
                },
                0,
                U256::from(1),
                U256::from(1),
            )]),
            ..Self::eip1559()
        }
    }

    pub fn with_hash(mut self, hash: B256) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_tx_type(mut self, tx_type: u8) -> Self {
        self.tx_type = tx_type;
        self
    }

    pub fn with_gas_price(mut self, gas_price: Option<u128>) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_max_fee_per_gas(mut self, max_fee: Option<u128>) -> Self {
        self.max_fee_per_gas = max_fee;
        self
    }

    pub fn with_max_priority_fee_per_gas(mut self, priority_fee: Option<u128>) -> Self {
        self.max_priority_fee_per_gas = priority_fee;
        self
    }

    pub fn with_to(mut self, to: Option<Address>) -> Self {
        self.to = to;
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_input(mut self, input: Bytes) -> Self {
        self.input = input;
        self
    }

    pub fn with_chain_id(mut self, chain_id: Option<u64>) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_access_list(mut self, access_list: Option<AccessList>) -> Self {
        self.access_list = access_list;
        self
    }

    pub fn with_max_fee_per_blob_gas(mut self, blob_fee: Option<u128>) -> Self {
        self.max_fee_per_blob_gas = blob_fee;
        self
    }

    pub fn with_blob_versioned_hashes(mut self, hashes: Option<Vec<B256>>) -> Self {
        self.blob_versioned_hashes = hashes;
        self
    }

    pub fn with_authorization_list(mut self, list: Option<Vec<SignedAuthorization>>) -> Self {
        self.authorization_list = list;
        self
    }
}

impl CandidateTransaction for TestTransaction {
    fn tx_hash(&self) -> B256 {
        self.hash
    }

    fn tx_type(&self) -> u8 {
        self.tx_type
    }

    fn sender(&self) -> Address {
        self.sender
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn gas_price(&self) -> Option<u128> {
        self.gas_price
    }

    fn max_fee_per_gas(&self) -> Option<u128> {
        self.max_fee_per_gas
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        self.max_priority_fee_per_gas
    }

    fn to(&self) -> Option<Address> {
        self.to
    }

    fn value(&self) -> U256 {
        self.value
    }

    fn input(&self) -> &Bytes {
        &self.input
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    fn access_list(&self) -> Option<&AccessList> {
        self.access_list.as_ref()
    }

    fn max_fee_per_blob_gas(&self) -> Option<u128> {
        self.max_fee_per_blob_gas
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        self.blob_versioned_hashes.as_deref()
    }

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        self.authorization_list.as_deref()
    }
}
