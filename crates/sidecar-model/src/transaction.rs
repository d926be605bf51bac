use alloy_consensus::{
    Transaction,
    TxEnvelope,
    transaction::Recovered,
};
use alloy_eips::{
    Typed2718,
    eip2930::AccessList,
    eip7702::SignedAuthorization,
};
use alloy_primitives::{
    Address,
    B256,
    Bytes,
    U256,
};

/// A transaction offered to the block under construction, as the encoder sees it.
///
/// Fee accessors return `None` when the field does not exist for the transaction's type:
/// `gas_price` is only present on legacy and access-list transactions, `max_fee_per_gas` only on
/// dynamic-fee ones.
pub trait CandidateTransaction {
    fn tx_hash(&self) -> B256;
    /// EIP-2718 type code.
    fn tx_type(&self) -> u8;
    /// Recovered signer.
    fn sender(&self) -> Address;
    fn gas_limit(&self) -> u64;
    fn gas_price(&self) -> Option<u128>;
    fn max_fee_per_gas(&self) -> Option<u128>;
    fn max_priority_fee_per_gas(&self) -> Option<u128>;
    /// `None` for contract creation.
    fn to(&self) -> Option<Address>;
    fn value(&self) -> U256;
    fn input(&self) -> &Bytes;
    fn nonce(&self) -> u64;
    fn chain_id(&self) -> Option<u64>;
    fn access_list(&self) -> Option<&AccessList>;
    fn max_fee_per_blob_gas(&self) -> Option<u128>;
    fn blob_versioned_hashes(&self) -> Option<&[B256]>;
    fn authorization_list(&self) -> Option<&[SignedAuthorization]>;
}

impl CandidateTransaction for Recovered<TxEnvelope> {
    fn tx_hash(&self) -> B256 {
        *self.inner().tx_hash()
    }

    fn tx_type(&self) -> u8 {
        self.inner().ty()
    }

    fn sender(&self) -> Address {
        self.signer()
    }

    fn gas_limit(&self) -> u64 {
        Transaction::gas_limit(self.inner())
    }

    fn gas_price(&self) -> Option<u128> {
        Transaction::gas_price(self.inner())
    }

    fn max_fee_per_gas(&self) -> Option<u128> {
        let tx = self.inner();
        tx.is_dynamic_fee()
            .then(|| Transaction::max_fee_per_gas(tx))
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        Transaction::max_priority_fee_per_gas(self.inner())
    }

    fn to(&self) -> Option<Address> {
        Transaction::to(self.inner())
    }

    fn value(&self) -> U256 {
        Transaction::value(self.inner())
    }

    fn input(&self) -> &Bytes {
        Transaction::input(self.inner())
    }

    fn nonce(&self) -> u64 {
        Transaction::nonce(self.inner())
    }

    fn chain_id(&self) -> Option<u64> {
        Transaction::chain_id(self.inner())
    }

    fn access_list(&self) -> Option<&AccessList> {
        Transaction::access_list(self.inner())
    }

    fn max_fee_per_blob_gas(&self) -> Option<u128> {
        Transaction::max_fee_per_blob_gas(self.inner())
    }

    fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        Transaction::blob_versioned_hashes(self.inner())
    }

    fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        Transaction::authorization_list(self.inner())
    }
}
