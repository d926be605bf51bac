//! Fail-open transaction admission through the credible layer sidecar.
//!
//! A block builder calls [`CredibleLayer::pre_process`] when a transaction is offered, and
//! [`CredibleLayer::post_process`] once it has been executed. Only a sidecar verdict of
//! `assertion_failed` or `failed`, delivered within the poll timeout, excludes the transaction.
//! [`CredibleLayer::on_block_added`] keeps the sidecar's view of the chain head current.

pub mod admission;
pub mod args;
pub mod block_notifier;
pub mod config;
mod error;
mod layer;
mod metrics;

pub use admission::{
    AdmissionCoordinator,
    AdmissionDecision,
    InclusionReason,
    REJECTION_REASON,
    SWEEP_INTERVAL,
    SeedOutcome,
    decide,
};
pub use args::{
    CredibleSidecarArgs,
    file::FileConfig,
};
pub use block_notifier::{
    BlockNotifier,
    BlockPushOutcome,
};
pub use config::{
    AdmissionConfig,
    ConfigError,
};
pub use error::CredibleLayerError;
pub use layer::CredibleLayer;
