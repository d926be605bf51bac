use alloy_consensus::TxType;
use tracing::warn;

use crate::{
    AccessListEntry,
    AuthorizationEnv,
    CandidateTransaction,
    TxEnv,
    TxKindEnv,
};

/// Chain id assumed when a transaction does not carry one and the minimal encoding is used.
const FALLBACK_CHAIN_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("unsupported transaction type {0}")]
    UnknownType(u8),
    #[error("type {0} transaction has no gas price")]
    MissingGasPrice(u8),
    #[error("type {0} transaction has no max fee per gas")]
    MissingMaxFee(u8),
    #[error("type {0} transaction cannot create a contract")]
    MissingDestination(u8),
    #[error("blob transaction carries no blob hashes")]
    MissingBlobHashes,
    #[error("set-code transaction has an empty authorization list")]
    EmptyAuthorizationList,
}

/// Human readable name of an EIP-2718 type code, for logs.
pub fn transaction_type_name(tx_type: u8) -> &'static str {
    match tx_type {
        0 => "Legacy",
        1 => "EIP-2930",
        2 => "EIP-1559",
        3 => "EIP-4844",
        4 => "EIP-7702",
        _ => "Unknown",
    }
}

/// Encode a candidate transaction, rejecting any transaction whose fields are inconsistent with
/// its type.
pub fn encode_transaction<T>(tx: &T) -> Result<TxEnv, EncodingError>
where
    T: CandidateTransaction + ?Sized,
{
    let tx_type = tx.tx_type();
    let ty = TxType::try_from(tx_type).map_err(|_| EncodingError::UnknownType(tx_type))?;

    let gas_price = match ty {
        TxType::Legacy | TxType::Eip2930 => {
            tx.gas_price()
                .ok_or(EncodingError::MissingGasPrice(tx_type))?
        }
        _ => {
            tx.max_fee_per_gas()
                .ok_or(EncodingError::MissingMaxFee(tx_type))?
        }
    };

    let gas_priority_fee = match ty {
        TxType::Legacy | TxType::Eip2930 => 0,
        _ => tx.max_priority_fee_per_gas().unwrap_or_default(),
    };

    let kind = match tx.to() {
        Some(to) => TxKindEnv::Call { to },
        None if matches!(ty, TxType::Eip4844 | TxType::Eip7702) => {
            return Err(EncodingError::MissingDestination(tx_type));
        }
        None => TxKindEnv::Create,
    };

    let (max_fee_per_blob_gas, blob_hashes) = if ty == TxType::Eip4844 {
        let hashes = tx
            .blob_versioned_hashes()
            .filter(|hashes| !hashes.is_empty())
            .ok_or(EncodingError::MissingBlobHashes)?;
        (tx.max_fee_per_blob_gas().unwrap_or_default(), hashes.to_vec())
    } else {
        (0, Vec::new())
    };

    let authorization_list = if ty == TxType::Eip7702 {
        tx.authorization_list()
            .filter(|list| !list.is_empty())
            .ok_or(EncodingError::EmptyAuthorizationList)?
            .iter()
            .map(AuthorizationEnv::from)
            .collect()
    } else {
        Vec::new()
    };

    let access_list = tx
        .access_list()
        .map(|list| list.iter().map(AccessListEntry::from).collect())
        .unwrap_or_default();

    Ok(TxEnv {
        tx_type,
        caller: tx.sender(),
        gas_limit: tx.gas_limit(),
        gas_price,
        gas_priority_fee,
        kind,
        value: tx.value(),
        data: tx.input().clone(),
        nonce: tx.nonce(),
        chain_id: tx.chain_id(),
        access_list,
        max_fee_per_blob_gas,
        blob_hashes,
        authorization_list,
    })
}

/// Environment built only from fields every transaction carries. Type-specific data is dropped
/// and the transaction is presented as legacy.
pub fn minimal_tx_env<T>(tx: &T) -> TxEnv
where
    T: CandidateTransaction + ?Sized,
{
    TxEnv {
        tx_type: 0,
        caller: tx.sender(),
        gas_limit: tx.gas_limit(),
        gas_price: tx.gas_price().unwrap_or_default(),
        gas_priority_fee: 0,
        kind: tx.to().into(),
        value: tx.value(),
        data: tx.input().clone(),
        nonce: tx.nonce(),
        chain_id: Some(tx.chain_id().unwrap_or(FALLBACK_CHAIN_ID)),
        access_list: Vec::new(),
        max_fee_per_blob_gas: 0,
        blob_hashes: Vec::new(),
        authorization_list: Vec::new(),
    }
}

/// [`encode_transaction`], degrading to [`minimal_tx_env`] instead of failing.
pub fn encode_transaction_or_minimal<T>(tx: &T) -> TxEnv
where
    T: CandidateTransaction + ?Sized,
{
    encode_transaction(tx).unwrap_or_else(|err| {
        warn!(
            tx_hash = %tx.tx_hash(),
            tx_type = transaction_type_name(tx.tx_type()),
            error = %err,
            "Falling back to minimal transaction environment"
        );
        minimal_tx_env(tx)
    })
}
