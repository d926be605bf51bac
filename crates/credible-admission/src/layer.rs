use std::{
    sync::Arc,
    time::Duration,
};

use alloy_consensus::Header;
use alloy_primitives::B256;
use sidecar_client::SidecarClient;
use sidecar_model::CandidateTransaction;
use tracing::info;

use crate::{
    admission::{
        AdmissionCoordinator,
        AdmissionDecision,
        InclusionReason,
        SeedOutcome,
    },
    block_notifier::{
        BlockNotifier,
        BlockPushOutcome,
    },
    config::AdmissionConfig,
    error::CredibleLayerError,
};

/// Entry point for a block builder: owns the sidecar client, the admission coordinator and the
/// block notifier.
///
/// When built from a disabled configuration no client is created and every hook is a no-op that
/// includes the transaction.
#[derive(Debug)]
pub struct CredibleLayer {
    active: Option<Active>,
}

#[derive(Debug)]
struct Active {
    client: Arc<SidecarClient>,
    coordinator: AdmissionCoordinator,
    notifier: BlockNotifier,
}

impl CredibleLayer {
    pub fn new(config: &AdmissionConfig) -> Result<Self, CredibleLayerError> {
        config.validate()?;
        if !config.enabled {
            info!("Credible layer disabled");
            return Ok(Self::disabled());
        }

        let client = Arc::new(SidecarClient::new(config.client_config()?)?);
        info!(sidecar_url = %client.base_url(), "Credible layer enabled");

        Ok(Self {
            active: Some(Active {
                coordinator: AdmissionCoordinator::new(Arc::clone(&client), config),
                notifier: BlockNotifier::new(
                    Arc::clone(&client),
                    config.block_env_defaults(),
                    config.block_env_timeout,
                ),
                client,
            }),
        })
    }

    pub fn disabled() -> Self {
        Self { active: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.active.is_some()
    }

    pub fn coordinator(&self) -> Option<&AdmissionCoordinator> {
        self.active.as_ref().map(|active| &active.coordinator)
    }

    pub fn pre_process<T>(&self, tx: &T) -> SeedOutcome
    where
        T: CandidateTransaction + ?Sized,
    {
        match &self.active {
            Some(active) => active.coordinator.pre_process(tx),
            None => SeedOutcome::Disabled,
        }
    }

    pub fn post_process(&self, hash: B256) -> AdmissionDecision {
        match &self.active {
            Some(active) => active.coordinator.post_process(hash),
            None => AdmissionDecision::Included(InclusionReason::Disabled),
        }
    }

    pub fn on_block_added(&self, header: &Header) -> BlockPushOutcome {
        match &self.active {
            Some(active) => active.notifier.on_block_added(header),
            None => BlockPushOutcome::Disabled,
        }
    }

    /// Stop the sidecar client. Hooks called afterwards fail open.
    pub fn shutdown(&self, grace: Duration) {
        if let Some(active) = &self.active {
            active.client.shutdown(grace);
        }
    }
}
