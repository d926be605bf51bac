use std::{
    sync::Arc,
    time::Duration,
};

use alloy_consensus::Header;
use sidecar_client::{
    SidecarClient,
    SidecarClientError,
};
use sidecar_model::{
    BlockEnvDefaults,
    api::{
        SEND_BLOCK_ENV,
        SendBlockEnvResponse,
    },
    encode_block_env,
};
use tracing::{
    debug,
    error,
    instrument,
    warn,
};

use crate::metrics;

/// What happened to a block environment push. Never surfaced as an error to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockPushOutcome {
    Accepted,
    /// The sidecar answered `success: false`.
    Rejected(Option<String>),
    Failed(SidecarClientError),
    Disabled,
}

impl BlockPushOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected(_) => "rejected",
            Self::Failed(_) => "failed",
            Self::Disabled => "disabled",
        }
    }
}

/// Pushes the environment of every newly added block to the sidecar.
///
/// Each push blocks the caller for at most `timeout`; a slower sidecar is reported as
/// [`BlockPushOutcome::Failed`] and the request completes in the background.
#[derive(Debug)]
pub struct BlockNotifier {
    client: Arc<SidecarClient>,
    defaults: BlockEnvDefaults,
    timeout: Duration,
}

impl BlockNotifier {
    pub fn new(client: Arc<SidecarClient>, defaults: BlockEnvDefaults, timeout: Duration) -> Self {
        Self {
            client,
            defaults,
            timeout,
        }
    }

    #[instrument(
        name = "block_notifier::on_block_added",
        skip_all,
        fields(block_number = header.number),
        level = "debug"
    )]
    pub fn on_block_added(&self, header: &Header) -> BlockPushOutcome {
        let block_env = encode_block_env(header, &self.defaults);

        let outcome = match self.client.call_timeout::<_, SendBlockEnvResponse>(
            SEND_BLOCK_ENV,
            &block_env,
            self.timeout,
        ) {
            Ok(response) if response.success => {
                debug!(block_number = header.number, "Block environment sent to sidecar");
                BlockPushOutcome::Accepted
            }
            Ok(response) => {
                warn!(
                    block_number = header.number,
                    error = ?response.error,
                    "Sidecar did not accept block environment"
                );
                BlockPushOutcome::Rejected(response.error)
            }
            Err(err) => {
                error!(
                    block_number = header.number,
                    error = %err,
                    "Failed to send block environment to sidecar"
                );
                BlockPushOutcome::Failed(err)
            }
        };

        metrics::record_block_env_push(outcome.label());
        outcome
    }
}
